use std::fs::File;
use std::io::{BufReader, BufWriter};

use anyhow::{bail, ensure, Context, Result};
use hex_core::Player;
use ndarray::{Array1, Array2};
use ndarray_npy::{read_npy, write_npy};
use serde::{Deserialize, Serialize};

use crate::config::SelfPlayConfig;
use crate::data::GameRecord;

/// Sidecar JSON describing a saved batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptManifest {
    pub game_count: usize,
    pub board_size: usize,
    pub config: SelfPlayConfig,
}

fn moves_path(path: &str) -> String {
    format!("{}_moves.npy", path)
}

fn lengths_path(path: &str) -> String {
    format!("{}_lengths.npy", path)
}

fn winners_path(path: &str) -> String {
    format!("{}_winners.npy", path)
}

fn manifest_path(path: &str) -> String {
    format!("{}_config.json", path)
}

/// Save game transcripts to NPY files
///
/// Creates four files:
/// - `{path}_moves.npy`: (G, N*N) i32 move indices, padded with -1
/// - `{path}_lengths.npy`: (G,) i32 number of moves per game
/// - `{path}_winners.npy`: (G,) i32 winner, 0 for A and 1 for B
/// - `{path}_config.json`: the batch settings
///
/// # Example
/// ```no_run
/// use hex_core::Player;
/// use hex_selfplay::{save_transcripts, GameRecord, SelfPlayConfig};
///
/// let config = SelfPlayConfig { board_size: 3, ..Default::default() };
/// let records = vec![GameRecord::new(3, vec![1, 0, 4, 3, 7], Player::A)];
/// save_transcripts(&records, &config, "selfplay").unwrap();
/// // Creates: selfplay_moves.npy, selfplay_lengths.npy, selfplay_winners.npy, selfplay_config.json
/// ```
pub fn save_transcripts(records: &[GameRecord], config: &SelfPlayConfig, path: &str) -> Result<()> {
    if records.is_empty() {
        bail!("Cannot save an empty batch of games");
    }

    let size = config.board_size;
    let cells = size * size;

    let mut moves = Array2::<i32>::from_elem((records.len(), cells), -1);
    let mut lengths = Array1::<i32>::zeros(records.len());
    let mut winners = Array1::<i32>::zeros(records.len());

    for (row, record) in records.iter().enumerate() {
        ensure!(
            record.board_size == size,
            "game {row} was played on a {}x{} board, expected {size}x{size}",
            record.board_size,
            record.board_size
        );
        ensure!(
            record.len() <= cells,
            "game {row} has {} moves, more than the {cells} cells on the board",
            record.len()
        );

        for (col, &action) in record.moves.iter().enumerate() {
            moves[[row, col]] = i32::try_from(action)?;
        }
        lengths[row] = i32::try_from(record.len())?;
        winners[row] = record.winner.index() as i32;
    }

    write_npy(moves_path(path), &moves)?;
    write_npy(lengths_path(path), &lengths)?;
    write_npy(winners_path(path), &winners)?;

    let manifest = TranscriptManifest {
        game_count: records.len(),
        board_size: size,
        config: config.clone(),
    };
    let file = File::create(manifest_path(path))
        .with_context(|| format!("failed to create {}", manifest_path(path)))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &manifest)?;

    Ok(())
}

/// Read the manifest written by [`save_transcripts`]
pub fn load_manifest(path: &str) -> Result<TranscriptManifest> {
    let file = File::open(manifest_path(path))
        .with_context(|| format!("failed to open {}", manifest_path(path)))?;
    let manifest = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("malformed manifest {}", manifest_path(path)))?;
    Ok(manifest)
}

/// Load transcripts written by [`save_transcripts`]
///
/// Every game is replayed; a transcript that is not a legal game ending
/// with the stored winner is an error.
pub fn load_transcripts(path: &str) -> Result<Vec<GameRecord>> {
    let manifest = load_manifest(path)?;

    let moves: Array2<i32> =
        read_npy(moves_path(path)).with_context(|| format!("failed to read {}", moves_path(path)))?;
    let lengths: Array1<i32> = read_npy(lengths_path(path))
        .with_context(|| format!("failed to read {}", lengths_path(path)))?;
    let winners: Array1<i32> = read_npy(winners_path(path))
        .with_context(|| format!("failed to read {}", winners_path(path)))?;

    let games = manifest.game_count;
    let cells = manifest.board_size * manifest.board_size;
    ensure!(
        moves.dim() == (games, cells),
        "moves array has shape {:?}, expected ({games}, {cells})",
        moves.dim()
    );
    ensure!(lengths.len() == games, "lengths array has {} entries, expected {games}", lengths.len());
    ensure!(winners.len() == games, "winners array has {} entries, expected {games}", winners.len());

    let mut records = Vec::with_capacity(games);
    for row in 0..games {
        let len = usize::try_from(lengths[row])
            .with_context(|| format!("game {row} has negative length"))?;
        ensure!(len <= cells, "game {row} has length {len}, board has {cells} cells");

        let game_moves = moves
            .row(row)
            .iter()
            .take(len)
            .map(|&m| usize::try_from(m).with_context(|| format!("game {row} has padding inside its moves")))
            .collect::<Result<Vec<_>>>()?;

        let winner = match winners[row] {
            0 => Player::A,
            1 => Player::B,
            other => bail!("game {row} has unknown winner code {other}"),
        };

        let record = GameRecord::new(manifest.board_size, game_moves, winner);
        ensure!(
            record.is_consistent(),
            "game {row} does not replay to a win for {winner}"
        );
        records.push(record);
    }

    Ok(records)
}
