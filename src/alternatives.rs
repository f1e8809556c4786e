use std::collections::HashMap;

use crate::collision::CollisionPair;
use crate::HashquineError;

/// A collision written into the stream, together with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative {
    /// Offset of the first collision byte in the stream.
    pub offset: usize,
    pub pair: CollisionPair,
}

impl Alternative {
    fn swap(&self, bytes: &mut [u8], from: &[u8], to: &[u8]) -> Result<(), HashquineError> {
        let end = self.offset + from.len();
        match bytes.get_mut(self.offset..end) {
            Some(span) if span == from => {
                span.copy_from_slice(to);
                Ok(())
            }
            _ => Err(HashquineError::Internal(format!(
                "stream does not hold the expected collision block at offset {}",
                self.offset
            ))),
        }
    }

    /// Replace the hidden block with the visible one.
    pub fn show(&self, bytes: &mut [u8]) -> Result<(), HashquineError> {
        self.swap(bytes, &self.pair.hidden, &self.pair.visible)
    }

    /// Replace the visible block with the hidden one.
    pub fn hide(&self, bytes: &mut [u8]) -> Result<(), HashquineError> {
        self.swap(bytes, &self.pair.visible, &self.pair.hidden)
    }
}

/// Collisions keyed by (digit position, digit value).
#[derive(Debug, Clone, Default)]
pub struct AlternativesTable {
    entries: HashMap<(usize, u8), Alternative>,
}

impl AlternativesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the collision for a slot. Each slot is written once.
    pub fn record(
        &mut self,
        position: usize,
        digit: u8,
        alternative: Alternative,
    ) -> Result<(), HashquineError> {
        if self.entries.contains_key(&(position, digit)) {
            return Err(HashquineError::Internal(format!(
                "collision for position {position} digit {digit:x} recorded twice"
            )));
        }
        self.entries.insert((position, digit), alternative);
        Ok(())
    }

    pub fn get(&self, position: usize, digit: u8) -> Option<&Alternative> {
        self.entries.get(&(position, digit))
    }

    /// Remove and return the collision for a slot.
    pub fn take(&mut self, position: usize, digit: u8) -> Option<Alternative> {
        self.entries.remove(&(position, digit))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by stream offset.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u8, &Alternative)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(&(pos, digit), alt)| (pos, digit, alt))
            .collect();
        entries.sort_by_key(|(_, _, alt)| alt.offset);
        entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alt(offset: usize) -> Alternative {
        Alternative {
            offset,
            pair: CollisionPair::new(vec![1, 2], vec![3, 4]),
        }
    }

    #[test]
    fn slots_are_write_once_read_once() {
        let mut table = AlternativesTable::new();
        table.record(3, 0xa, alt(64)).unwrap();
        assert!(table.record(3, 0xa, alt(128)).is_err());
        assert_eq!(table.take(3, 0xa), Some(alt(64)));
        assert_eq!(table.take(3, 0xa), None);
        assert!(table.is_empty());
    }

    #[test]
    fn show_and_hide_check_current_bytes() {
        let a = alt(1);
        let mut bytes = vec![0, 3, 4, 0];
        a.show(&mut bytes).unwrap();
        assert_eq!(bytes, vec![0, 1, 2, 0]);
        assert!(a.show(&mut bytes).is_err());
        a.hide(&mut bytes).unwrap();
        assert_eq!(bytes, vec![0, 3, 4, 0]);
        assert!(alt(3).show(&mut bytes).is_err());
    }

    #[test]
    fn iterates_in_stream_order() {
        let mut table = AlternativesTable::new();
        table.record(1, 0, alt(300)).unwrap();
        table.record(0, 5, alt(100)).unwrap();
        table.record(0, 6, alt(200)).unwrap();
        let order: Vec<_> = table.iter().map(|(p, d, _)| (p, d)).collect();
        assert_eq!(order, vec![(0, 5), (0, 6), (1, 0)]);
    }
}
