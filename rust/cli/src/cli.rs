//! Command-line definition (clap derive).

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "jetons",
    version,
    about = "Developer harness for the jetons chat-table poker engine"
)]
pub struct JetonsCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play computer-only hands and log them as JSON Lines
    Sim {
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        hands: u64,
        /// Computer seats at the table
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=9))]
        players: u8,
        #[arg(long)]
        seed: Option<u64>,
        /// Policy for every seat (baseline, passive)
        #[arg(long)]
        ai: Option<String>,
        /// Hand history file (JSONL)
        #[arg(long)]
        output: Option<String>,
    },
    /// Name the best category of 5 to 7 cards
    Eval {
        /// e.g. "A♠ K♠ Q♠ J♠ 10♠" or "As,Ks,Qs,Js,Ts"
        #[arg(long)]
        cards: String,
    },
    /// Deal hole cards and a full board
    Deal {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=9))]
        players: u8,
    },
    /// Show the resolved configuration and where each value came from
    Cfg {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        ai: Option<String>,
    },
    /// Play one game of Russian roulette against a 500-chip test balance
    Roulette {
        #[arg(long)]
        stake: u64,
        #[arg(long)]
        seed: Option<u64>,
        /// Walk away after surviving this many chambers
        #[arg(long)]
        flee_after: Option<usize>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_defaults_to_two_players() {
        let cli = JetonsCli::try_parse_from(["jetons", "sim", "--hands", "3"]).unwrap();
        match cli.cmd {
            Commands::Sim { hands, players, .. } => {
                assert_eq!(hands, 3);
                assert_eq!(players, 2);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn seat_count_is_bounded() {
        assert!(JetonsCli::try_parse_from(["jetons", "deal", "--players", "1"]).is_err());
        assert!(JetonsCli::try_parse_from(["jetons", "deal", "--players", "10"]).is_err());
        assert!(JetonsCli::try_parse_from(["jetons", "deal", "--players", "9"]).is_ok());
    }

    #[test]
    fn zero_hands_is_rejected() {
        assert!(JetonsCli::try_parse_from(["jetons", "sim", "--hands", "0"]).is_err());
    }

    #[test]
    fn roulette_accepts_flee_after() {
        let cli = JetonsCli::try_parse_from([
            "jetons",
            "roulette",
            "--stake",
            "10",
            "--flee-after",
            "2",
        ])
        .unwrap();
        assert!(matches!(
            cli.cmd,
            Commands::Roulette {
                stake: 10,
                flee_after: Some(2),
                ..
            }
        ));
    }
}
