use crate::emotion::types::{Emotion, Suggestion, Trend};

struct ToneTable {
    tone: &'static str,
    approach: &'static [&'static str],
    avoid: &'static [&'static str],
}

const SAD: ToneTable = ToneTable {
    tone: "empathetic and comforting",
    approach: &[
        "Ask open questions about how they feel",
        "Offer support without judgement",
        "Suggest positive activities",
    ],
    avoid: &["Minimizing their feelings", "Being overly enthusiastic"],
};

const ANGRY: ToneTable = ToneTable {
    tone: "calm and soothing",
    approach: &[
        "Acknowledge the frustration",
        "Offer a breathing exercise",
        "Steer towards solutions",
    ],
    avoid: &["Being confrontational", "Ignoring the anger"],
};

const HAPPY: ToneTable = ToneTable {
    tone: "cheerful and energetic",
    approach: &[
        "Reinforce the positive mood",
        "Share the enthusiasm",
        "Encourage keeping up the energy",
    ],
    avoid: &["Dampening the mood"],
};

const FEAR: ToneTable = ToneTable {
    tone: "reassuring and calm",
    approach: &[
        "Reassure them about the situation",
        "Offer relaxation techniques",
        "Be a steady presence",
    ],
    avoid: &["Amplifying their worries"],
};

const GENERIC: ToneTable = ToneTable {
    tone: "friendly and engaging",
    approach: &[
        "Engage the conversation naturally",
        "Ask questions to understand better",
    ],
    avoid: &[],
};

pub const SUSTAINED_SADNESS_APPROACH: &str =
    "Gently suggest talking to someone they trust";
pub const DECLINING_APPROACH: &str = "Pay closer attention to their well-being";
pub const IMPROVING_APPROACH: &str = "Encourage the positive progress";

fn table_for(dominant: Option<Emotion>) -> &'static ToneTable {
    match dominant {
        Some(Emotion::Sad) => &SAD,
        Some(Emotion::Angry) => &ANGRY,
        Some(Emotion::Happy) => &HAPPY,
        Some(Emotion::Fear) => &FEAR,
        _ => &GENERIC,
    }
}

/// 顺序：情绪表条目 → 持续悲伤升级项 → 趋势项
pub fn build(dominant: Option<Emotion>, trend: Trend, sadness_persistent: bool) -> Suggestion {
    let table = table_for(dominant);
    let mut approach: Vec<String> = table.approach.iter().map(|s| s.to_string()).collect();
    let avoid = table.avoid.iter().map(|s| s.to_string()).collect();

    if dominant == Some(Emotion::Sad) && sadness_persistent {
        approach.push(SUSTAINED_SADNESS_APPROACH.to_string());
    }

    match trend {
        Trend::Declining => approach.push(DECLINING_APPROACH.to_string()),
        Trend::Improving => approach.push(IMPROVING_APPROACH.to_string()),
        Trend::Stable => {}
    }

    Suggestion {
        dominant_emotion: dominant,
        trend,
        tone: table.tone.to_string(),
        approach,
        avoid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sustained_sadness_escalates() {
        let s = build(Some(Emotion::Sad), Trend::Stable, true);
        assert_eq!(s.approach.len(), 4);
        assert_eq!(s.approach.last().unwrap(), SUSTAINED_SADNESS_APPROACH);

        let s = build(Some(Emotion::Sad), Trend::Stable, false);
        assert_eq!(s.approach.len(), 3);
        assert!(!s.approach.iter().any(|a| a == SUSTAINED_SADNESS_APPROACH));
    }

    #[test]
    fn persistence_flag_only_matters_for_sadness() {
        let s = build(Some(Emotion::Angry), Trend::Stable, true);
        assert!(!s.approach.iter().any(|a| a == SUSTAINED_SADNESS_APPROACH));
        assert_eq!(s.tone, "calm and soothing");
    }

    #[test]
    fn trend_item_is_layered_last() {
        let s = build(Some(Emotion::Sad), Trend::Declining, true);
        assert_eq!(s.approach[3], SUSTAINED_SADNESS_APPROACH);
        assert_eq!(s.approach[4], DECLINING_APPROACH);

        let s = build(Some(Emotion::Happy), Trend::Improving, false);
        assert_eq!(s.approach.last().unwrap(), IMPROVING_APPROACH);
        assert_eq!(s.avoid, vec!["Dampening the mood".to_string()]);
    }

    #[test]
    fn other_classes_use_generic_table() {
        for dominant in [None, Some(Emotion::Neutral), Some(Emotion::Surprise), Some(Emotion::Disgust)] {
            let s = build(dominant, Trend::Stable, false);
            assert_eq!(s.tone, "friendly and engaging");
            assert_eq!(s.approach.len(), 2);
            assert!(s.avoid.is_empty());
            assert_eq!(s.dominant_emotion, dominant);
        }
    }
}
