use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::player::{PlayerAction, PlayerId};

/// Betting street, derived from the number of community cards revealed.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Street {
    /// No community card yet
    Preflop,
    /// 3 community cards
    Flop,
    /// 4th community card
    Turn,
    /// 5th community card
    River,
}

impl Street {
    pub fn from_board_len(len: usize) -> Street {
        match len {
            0..=2 => Street::Preflop,
            3 => Street::Flop,
            4 => Street::Turn,
            _ => Street::River,
        }
    }
}

/// One accepted action, in the order it was applied.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player_id: PlayerId,
    pub street: Street,
    pub action: PlayerAction,
}

/// History of one finished hand, one JSON object per line in hand logs.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    /// Format: YYYYMMDD-NNNNNN
    pub hand_id: String,
    /// Seed of the deck the hand was dealt from
    pub seed: Option<u64>,
    pub actions: Vec<ActionRecord>,
    pub board: Vec<Card>,
    /// Human readable result, e.g. "1234 wins 80 with Brelan"
    pub result: Option<String>,
    /// RFC3339, filled in by [`HandLogger::write`] when missing
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
    #[serde(default)]
    pub showdown: Option<ShowdownInfo>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShowdownInfo {
    pub winners: Vec<PlayerId>,
    /// e.g. "split pot", "won by fold"
    #[serde(default)]
    pub notes: Option<String>,
}

pub fn format_hand_id(yyyymmdd: &str, seq: u64) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

pub fn today() -> String {
    Utc::now().format("%Y%m%d").to_string()
}

/// Appends [`HandRecord`]s to a JSON Lines file.
pub struct HandLogger {
    writer: Option<BufWriter<File>>,
    written: usize,
}

impl HandLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            written: 0,
        })
    }

    /// A logger that serializes records without writing them anywhere.
    pub fn discard() -> Self {
        Self {
            writer: None,
            written: 0,
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn write(&mut self, record: &HandRecord) -> std::io::Result<()> {
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        self.written += 1;
        Ok(())
    }
}
