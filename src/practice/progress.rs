// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Progress through a scale played one note at a time.

use crate::music::pitch::Pitch;
use crate::music::scale::major_scale;

/// Result of offering a pitch to a [`ScaleProgress`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    /// The pitch was the expected next note
    pub matched: bool,
    /// The last note of the sequence was just played
    pub completed: bool,
}

/// Cursor over an immutable scale sequence.
///
/// A wrong note neither advances nor resets the cursor. There is no
/// debouncing: two note-ons for the expected pitch advance twice if the
/// second one is also expected next.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleProgress {
    notes: Vec<Pitch>,
    index: usize,
}

impl ScaleProgress {
    /// Start at the first note of `notes`
    pub fn new(notes: Vec<Pitch>) -> Self {
        Self { notes, index: 0 }
    }

    /// Major scale on `root`, root through octave
    pub fn major(root: Pitch) -> Self {
        Self::new(major_scale(root))
    }

    /// Offer a pitch; advances only when it is the expected note
    pub fn try_advance(&mut self, pitch: Pitch) -> Advance {
        if self.notes.get(self.index) == Some(&pitch) {
            self.index += 1;
            Advance {
                matched: true,
                completed: self.is_complete(),
            }
        } else {
            Advance {
                matched: false,
                completed: false,
            }
        }
    }

    /// 1-based position of the next expected note
    pub fn current_degree(&self) -> usize {
        self.index + 1
    }

    /// Every note has been played
    pub fn is_complete(&self) -> bool {
        self.index == self.notes.len()
    }

    /// Next expected pitch, `None` once complete
    pub fn expected(&self) -> Option<Pitch> {
        self.notes.get(self.index).copied()
    }

    /// First note of the sequence
    pub fn root(&self) -> Option<Pitch> {
        self.notes.first().copied()
    }

    /// The whole sequence
    pub fn notes(&self) -> &[Pitch] {
        &self.notes
    }

    /// Zero-based cursor
    pub fn index(&self) -> usize {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const C_MAJOR: [Pitch; 8] = [60, 62, 64, 65, 67, 69, 71, 72];

    #[test]
    fn test_full_scale_in_order() {
        let mut progress = ScaleProgress::major(60);
        assert_eq!(progress.notes(), &C_MAJOR);

        for &pitch in &C_MAJOR[..7] {
            assert_eq!(
                progress.try_advance(pitch),
                Advance { matched: true, completed: false }
            );
        }
        assert_eq!(
            progress.try_advance(72),
            Advance { matched: true, completed: true }
        );
        assert!(progress.is_complete());
        assert_eq!(progress.expected(), None);
    }

    #[test]
    fn test_wrong_note_leaves_cursor() {
        let mut progress = ScaleProgress::major(60);
        assert_eq!(
            progress.try_advance(61),
            Advance { matched: false, completed: false }
        );
        assert_eq!(progress.index(), 0);
        assert_eq!(progress.current_degree(), 1);
    }

    #[test]
    fn test_wrong_note_mid_scale_does_not_reset() {
        let mut progress = ScaleProgress::major(60);
        progress.try_advance(60);
        progress.try_advance(62);
        progress.try_advance(63);
        assert_eq!(progress.current_degree(), 3);
        assert_eq!(progress.expected(), Some(64));
    }

    #[test]
    fn test_repeated_note_passes_through() {
        // No debouncing: a repeated pitch advances again if it is next.
        let mut progress = ScaleProgress::new(vec![60, 60, 62]);
        assert!(progress.try_advance(60).matched);
        assert!(progress.try_advance(60).matched);
        assert_eq!(progress.current_degree(), 3);
    }

    #[test]
    fn test_degree_counts_from_one() {
        let mut progress = ScaleProgress::major(57);
        assert_eq!(progress.root(), Some(57));
        assert_eq!(progress.current_degree(), 1);
        progress.try_advance(57);
        assert_eq!(progress.current_degree(), 2);
    }
}
