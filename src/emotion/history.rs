use std::collections::VecDeque;

use crate::constants::TREND_MIN_SAMPLES;
use crate::emotion::config::HistoryConfig;
use crate::emotion::stabilizer::majority;
use crate::emotion::types::{
    round1, round2, Emotion, EmotionResult, EmotionShare, HistoryStatistics, Trend,
};

#[derive(Debug, Clone)]
pub struct EmotionHistory {
    results: VecDeque<EmotionResult>,
    capacity: usize,
    trend_threshold: f64,
}

impl EmotionHistory {
    pub fn new(config: &HistoryConfig) -> Self {
        Self {
            results: VecDeque::with_capacity(config.capacity),
            capacity: config.capacity,
            trend_threshold: config.trend_threshold,
        }
    }

    pub fn record(&mut self, result: EmotionResult) {
        self.results.push_back(result);
        while self.results.len() > self.capacity {
            self.results.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn results(&self) -> impl Iterator<Item = &EmotionResult> + '_ {
        self.results.iter()
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }

    pub fn dominant_emotion(&self) -> Option<Emotion> {
        majority(self.results.iter().map(|r| r.emotion))
    }

    pub fn is_persistent(&self, emotion: Emotion, threshold: f64) -> bool {
        if self.results.is_empty() {
            return false;
        }
        let count = self.results.iter().filter(|r| r.emotion == emotion).count();
        (count as f64 / self.results.len() as f64) >= threshold
    }

    /// 后半窗口平均积极度减前半窗口，中点归入后半
    pub fn trend(&self) -> Trend {
        if self.results.len() < TREND_MIN_SAMPLES {
            return Trend::Stable;
        }

        let mid = self.results.len() / 2;
        let (earlier, later) = self.results.iter().enumerate().fold(
            ((0.0_f64, 0_usize), (0.0_f64, 0_usize)),
            |(mut earlier, mut later), (idx, r)| {
                let half = if idx < mid { &mut earlier } else { &mut later };
                half.0 += r.emotion.positivity();
                half.1 += 1;
                (earlier, later)
            },
        );

        let diff = later.0 / later.1 as f64 - earlier.0 / earlier.1 as f64;
        if diff > self.trend_threshold {
            Trend::Improving
        } else if diff < -self.trend_threshold {
            Trend::Declining
        } else {
            Trend::Stable
        }
    }

    pub fn statistics(&self) -> HistoryStatistics {
        let total = self.results.len();
        if total == 0 {
            return HistoryStatistics::default();
        }

        let mut counts = [0_usize; 7];
        let mut confidence_sums = [0.0_f64; 7];
        for r in &self.results {
            counts[r.emotion.index()] += 1;
            confidence_sums[r.emotion.index()] += r.confidence;
        }

        let distribution = Emotion::ALL
            .into_iter()
            .filter(|e| counts[e.index()] > 0)
            .map(|e| {
                let count = counts[e.index()];
                EmotionShare {
                    emotion: e,
                    count,
                    percentage: round1(count as f64 / total as f64 * 100.0),
                    avg_confidence: round2(confidence_sums[e.index()] / count as f64),
                }
            })
            .collect();

        HistoryStatistics {
            total,
            dominant: self.dominant_emotion(),
            distribution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::types::EmotionDistribution;
    use Emotion::*;

    fn result(emotion: Emotion, confidence: f64) -> EmotionResult {
        EmotionResult::new(emotion, confidence, EmotionDistribution::default(), None)
    }

    fn history_of(labels: &[Emotion]) -> EmotionHistory {
        let mut h = EmotionHistory::new(&HistoryConfig::default());
        for label in labels {
            h.record(result(*label, 0.5));
        }
        h
    }

    #[test]
    fn capacity_is_bounded_fifo() {
        let mut h = EmotionHistory::new(&HistoryConfig::default());
        for i in 0..25 {
            let emotion = if i < 20 { Angry } else { Happy };
            h.record(result(emotion, 0.5));
            assert!(h.len() <= 10);
        }
        let labels: Vec<_> = h.results().map(|r| r.emotion).collect();
        assert_eq!(&labels[..5], &[Angry; 5]);
        assert_eq!(&labels[5..], &[Happy; 5]);
    }

    #[test]
    fn dominant_ties_go_to_first_seen() {
        assert_eq!(history_of(&[]).dominant_emotion(), None);
        assert_eq!(history_of(&[Sad, Happy, Happy, Sad]).dominant_emotion(), Some(Sad));
        assert_eq!(history_of(&[Sad, Happy, Happy]).dominant_emotion(), Some(Happy));
    }

    #[test]
    fn persistence_threshold_is_inclusive() {
        let six = history_of(&[Angry, Angry, Angry, Angry, Angry, Angry, Sad, Sad, Sad, Sad]);
        assert!(six.is_persistent(Angry, 0.6));
        let five = history_of(&[Angry, Angry, Angry, Angry, Angry, Sad, Sad, Sad, Sad, Sad]);
        assert!(!five.is_persistent(Angry, 0.6));
        assert!(!history_of(&[]).is_persistent(Angry, 0.0));
    }

    #[test]
    fn trend_improving_declining_and_stable() {
        let improving = history_of(&[Sad, Sad, Sad, Sad, Happy, Happy, Happy, Happy]);
        assert_eq!(improving.trend(), Trend::Improving);

        let declining = history_of(&[Happy, Happy, Neutral, Angry, Angry]);
        assert_eq!(declining.trend(), Trend::Declining);

        let stable = history_of(&[Neutral, Neutral, Neutral, Neutral]);
        assert_eq!(stable.trend(), Trend::Stable);

        assert_eq!(history_of(&[Sad, Happy]).trend(), Trend::Stable);
    }

    #[test]
    fn odd_length_split_puts_midpoint_in_later_half() {
        // mid = 1: earlier [angry] = -1.0, later [neutral, neutral] = 0.0
        assert_eq!(history_of(&[Angry, Neutral, Neutral]).trend(), Trend::Improving);
        // earlier [neutral] = 0.0, later [neutral, fear] = -0.25
        assert_eq!(history_of(&[Neutral, Neutral, Fear]).trend(), Trend::Declining);
        // earlier [neutral] = 0.0, later [fear, neutral] = -0.25
        assert_eq!(history_of(&[Neutral, Fear, Neutral]).trend(), Trend::Declining);
    }

    #[test]
    fn clear_resets_queries() {
        let mut h = history_of(&[Sad, Sad, Sad, Happy, Happy, Happy]);
        h.clear();
        assert!(h.is_empty());
        assert_eq!(h.dominant_emotion(), None);
        assert_eq!(h.trend(), Trend::Stable);
        assert_eq!(h.statistics(), HistoryStatistics::default());
    }

    #[test]
    fn statistics_summarize_window() {
        let mut h = EmotionHistory::new(&HistoryConfig::default());
        h.record(result(Happy, 0.8));
        h.record(result(Sad, 0.4));
        h.record(result(Happy, 0.6));

        let stats = h.statistics();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.dominant, Some(Happy));
        assert_eq!(stats.distribution.len(), 2);
        assert_eq!(stats.distribution[0].emotion, Happy);
        assert_eq!(stats.distribution[0].count, 2);
        assert_eq!(stats.distribution[0].percentage, 66.7);
        assert_eq!(stats.distribution[0].avg_confidence, 0.7);
        assert_eq!(stats.distribution[1].emotion, Sad);
        assert_eq!(stats.distribution[1].percentage, 33.3);
    }
}
