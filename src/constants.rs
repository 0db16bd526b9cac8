/// 稳定化缓冲区长度（最近 N 帧的原始主导情绪标签）
pub const STABILIZER_WINDOW: usize = 5;

/// 开始多数投票所需的最少标签数，不足时直接透传当前帧标签
pub const STABILIZER_MIN_VOTES: usize = 3;

/// 情绪历史缓冲区长度
pub const HISTORY_CAPACITY: usize = 10;

/// 默认持续性阈值（窗口内占比）
pub const DEFAULT_PERSISTENCE_THRESHOLD: f64 = 0.6;

/// 前后半窗口平均积极度之差超过此值即判定为上升/下降趋势
pub const TREND_THRESHOLD: f64 = 0.2;

/// 趋势分析所需的最少历史条数
pub const TREND_MIN_SAMPLES: usize = 3;

/// 四舍五入到两位小数后，分布总和允许偏离 1.0 的范围
pub const DISTRIBUTION_SUM_TOLERANCE: f64 = 0.02;

/// 平均眼睛面积超过人脸面积的此比例时视为“睁大眼睛”
pub const SURPRISE_EYE_AREA_RATIO: f64 = 0.02;

/// 默认每隔多少帧处理一帧
pub const DEFAULT_SAMPLE_EVERY: u64 = 5;

/// 默认 Haar cascade 文件目录
pub const DEFAULT_CASCADE_DIR: &str = "/usr/share/opencv4/haarcascades";

pub const FACE_CASCADE_FILE: &str = "haarcascade_frontalface_default.xml";
pub const SMILE_CASCADE_FILE: &str = "haarcascade_smile.xml";
pub const EYE_CASCADE_FILE: &str = "haarcascade_eye.xml";
