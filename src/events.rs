//! Historical event timeline tables.
//!
//! The timeline is an immutable, ordered sequence of events loaded once at
//! startup (built-in content or a JSON file) and referenced read-only by
//! every other system.

use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// A single event on the timeline.
///
/// Coordinates are geographic degrees: longitude east-positive in
/// [-180, 180], latitude north-positive in [-90, 90].
#[derive(Clone, Debug, Deserialize)]
pub struct TimelineEvent {
    /// Position in the timeline; assigned by [`Timeline::new`], any value
    /// present in a config file is overwritten.
    #[serde(default)]
    pub index: usize,
    pub year: i32,
    pub title: String,
    /// Narrated body text. Split into sentences for playback.
    pub text: String,
    /// Human-readable place name shown alongside the title.
    pub location: String,
    /// RGB accent used for the event's marker and panel highlights.
    pub accent_color: [u8; 3],
    pub longitude: f64,
    pub latitude: f64,
}

/// Ordered, fixed-cardinality event sequence.
///
/// At least two events are required; navigation indices wrap modulo the
/// event count, so there is no out-of-range error path.
#[derive(Clone, Debug)]
pub struct Timeline {
    events: Vec<TimelineEvent>,
    max_adjacent_gap: i32,
}

impl Timeline {
    pub fn new(mut events: Vec<TimelineEvent>) -> Self {
        assert!(events.len() >= 2, "timeline needs at least two events");
        for (i, event) in events.iter_mut().enumerate() {
            event.index = i;
        }
        let max_adjacent_gap = events
            .windows(2)
            .map(|pair| (pair[1].year - pair[0].year).abs())
            .max()
            .unwrap_or(1)
            .max(1);
        Timeline {
            events,
            max_adjacent_gap,
        }
    }

    /// Load a timeline from a JSON array of events.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let raw = fs::read_to_string(path)?;
        let events: Vec<TimelineEvent> = serde_json::from_str(&raw)?;
        if events.len() < 2 {
            return Err(format!(
                "timeline file {} has {} events, need at least 2",
                path.display(),
                events.len()
            )
            .into());
        }
        Ok(Timeline::new(events))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn get(&self, index: usize) -> &TimelineEvent {
        &self.events[index]
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    /// Largest |year difference| between consecutive events, at least 1.
    pub fn max_adjacent_gap(&self) -> i32 {
        self.max_adjacent_gap
    }

    /// Wrap an arbitrary requested index into `[0, len)`.
    pub fn bound_index(&self, requested: i64) -> usize {
        requested.rem_euclid(self.events.len() as i64) as usize
    }
}

/// Built-in timeline: four milestones of machine intelligence.
pub fn builtin_timeline() -> Timeline {
    Timeline::new(vec![
        TimelineEvent {
            index: 0,
            year: 1950,
            title: "The Imitation Game".to_string(),
            text: "Alan Turing asks whether machines can think. His paper \
                   replaces the question with a parlor game of deception. \
                   The test he proposes still frames the debate today."
                .to_string(),
            location: "Manchester, England".to_string(),
            accent_color: [96, 165, 250],
            longitude: -2.24,
            latitude: 53.48,
        },
        TimelineEvent {
            index: 1,
            year: 1966,
            title: "ELIZA Speaks".to_string(),
            text: "A few hundred lines of pattern matching impersonate a \
                   therapist. Joseph Weizenbaum is alarmed by how readily \
                   people confide in it."
                .to_string(),
            location: "Cambridge, Massachusetts".to_string(),
            accent_color: [52, 211, 153],
            longitude: -71.09,
            latitude: 42.36,
        },
        TimelineEvent {
            index: 2,
            year: 1997,
            title: "Deep Blue's Gambit".to_string(),
            text: "A chess machine defeats the reigning world champion in a \
                   rematch watched around the globe. Garry Kasparov resigns \
                   game six after nineteen moves."
                .to_string(),
            location: "New York City".to_string(),
            accent_color: [251, 146, 60],
            longitude: -74.01,
            latitude: 40.71,
        },
        TimelineEvent {
            index: 3,
            year: 2024,
            title: "The Nobel Nod".to_string(),
            text: "Neural network pioneers receive Nobel prizes in physics \
                   and chemistry. The committee's citation credits machine \
                   learning with reshaping science itself."
                .to_string(),
            location: "Stockholm, Sweden".to_string(),
            accent_color: [232, 121, 249],
            longitude: 18.07,
            latitude: 59.33,
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_shape() {
        let timeline = builtin_timeline();
        assert_eq!(timeline.len(), 4);
        let years: Vec<i32> = timeline.events().iter().map(|e| e.year).collect();
        assert_eq!(years, vec![1950, 1966, 1997, 2024]);
        for (i, event) in timeline.events().iter().enumerate() {
            assert_eq!(event.index, i);
        }
    }

    #[test]
    fn test_max_adjacent_gap() {
        let timeline = builtin_timeline();
        // Gaps are 16, 31, 27.
        assert_eq!(timeline.max_adjacent_gap(), 31);
    }

    #[test]
    fn test_bound_index_wraps_negatives() {
        let timeline = builtin_timeline();
        assert_eq!(timeline.bound_index(0), 0);
        assert_eq!(timeline.bound_index(5), 1);
        assert_eq!(timeline.bound_index(-1), 3);
        assert_eq!(timeline.bound_index(-9), 3);
        assert_eq!(timeline.bound_index(4), 0);
    }
}
