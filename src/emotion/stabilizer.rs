use std::collections::VecDeque;

use crate::emotion::config::StabilizerConfig;
use crate::emotion::types::Emotion;

/// 对最近 N 帧的原始标签做多数投票，只平滑标签，不改动分布
#[derive(Debug, Clone)]
pub struct TemporalStabilizer {
    labels: VecDeque<Emotion>,
    window: usize,
    min_votes: usize,
}

impl TemporalStabilizer {
    pub fn new(config: &StabilizerConfig) -> Self {
        Self {
            labels: VecDeque::with_capacity(config.window),
            window: config.window,
            min_votes: config.min_votes,
        }
    }

    pub fn push(&mut self, raw: Emotion) -> Emotion {
        self.labels.push_back(raw);
        while self.labels.len() > self.window {
            self.labels.pop_front();
        }

        if self.labels.len() < self.min_votes {
            return raw;
        }
        majority(self.labels.iter().copied()).unwrap_or(raw)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = Emotion> + '_ {
        self.labels.iter().copied()
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }
}

/// 出现次数最多的标签，同票时取最先出现的
pub(crate) fn majority(labels: impl Iterator<Item = Emotion>) -> Option<Emotion> {
    let mut counts = [0_usize; 7];
    let mut order: Vec<Emotion> = Vec::with_capacity(7);
    for label in labels {
        if counts[label.index()] == 0 {
            order.push(label);
        }
        counts[label.index()] += 1;
    }

    let mut best: Option<(Emotion, usize)> = None;
    for label in order {
        let count = counts[label.index()];
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((label, count)),
        }
    }
    best.map(|(label, _)| label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Emotion::*;

    fn stabilizer() -> TemporalStabilizer {
        TemporalStabilizer::new(&StabilizerConfig::default())
    }

    #[test]
    fn cold_start_passes_through() {
        let mut s = stabilizer();
        assert_eq!(s.push(Sad), Sad);
        assert_eq!(s.push(Happy), Happy);
    }

    #[test]
    fn majority_of_five() {
        let mut s = stabilizer();
        let mut last = Happy;
        for label in [Happy, Happy, Sad, Happy, Sad] {
            last = s.push(label);
        }
        assert_eq!(last, Happy);
    }

    #[test]
    fn tie_goes_to_first_inserted() {
        let mut s = stabilizer();
        s.push(Sad);
        s.push(Angry);
        assert_eq!(s.push(Angry), Angry);
        assert_eq!(s.push(Sad), Sad);
    }

    #[test]
    fn window_evicts_oldest() {
        let mut s = stabilizer();
        for label in [Angry, Angry, Angry, Happy, Happy, Happy] {
            s.push(label);
        }
        assert_eq!(s.len(), 5);
        assert_eq!(s.labels().collect::<Vec<_>>(), vec![Angry, Angry, Happy, Happy, Happy]);
        assert_eq!(s.push(Neutral), Happy);
    }

    #[test]
    fn clear_restores_cold_start() {
        let mut s = stabilizer();
        for _ in 0..5 {
            s.push(Happy);
        }
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.push(Sad), Sad);
        assert_eq!(s.push(Fear), Fear);
    }

    #[test]
    fn majority_of_nothing_is_none() {
        assert_eq!(majority(std::iter::empty()), None);
    }
}
