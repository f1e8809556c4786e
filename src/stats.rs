//! `Stats` tracks oracle traffic and the trailer search for one run. It does
//! no logging of its own until `report` is called.

use crate::PairRejection;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub collisions_requested: u64,
    pub collisions_used: u64,
    pub rejected_invalid: u64,
    pub rejected_infeasible: u64,
    pub trailer_candidates: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick_request(&mut self) {
        self.collisions_requested += 1;
    }

    pub fn tick_used(&mut self) {
        self.collisions_used += 1;
    }

    pub fn log_rejection(&mut self, rejection: PairRejection) {
        match rejection {
            PairRejection::Infeasible => self.rejected_infeasible += 1,
            _ => self.rejected_invalid += 1,
        }
    }

    pub fn report(&self) {
        eprintln!(
            "Requested {} collisions, used {}, rejected {} invalid and {} unusable; {} trailer values tried",
            self.collisions_requested,
            self.collisions_used,
            self.rejected_invalid,
            self.rejected_infeasible,
            self.trailer_candidates
        );
    }
}
