//! Plain text frames.

use wator_core::Occupancy;
use wator_world::GridSnapshot;

fn cell(occupancy: Occupancy) -> &'static str {
    match occupancy {
        Occupancy::Empty => "[   ]",
        Occupancy::Fish => "[ F ]",
        Occupancy::Shark => "[ S ]",
    }
}

/// One line per grid row, top row first
pub fn render_grid(snapshot: &GridSnapshot) -> String {
    snapshot
        .rows()
        .map(|row| row.iter().map(|&occupancy| cell(occupancy)).collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_frame(chronon: u64, fish: usize, sharks: usize, snapshot: &GridSnapshot) -> String {
    format!(
        "Chronon {} - fish: {}, sharks: {}\n{}\n",
        chronon,
        fish,
        sharks,
        render_grid(snapshot)
    )
}
