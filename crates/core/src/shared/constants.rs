/// Period between play-position samples while audio is playing.
pub const SAMPLE_PERIOD_SECS: f64 = 5.0;

/// Drags shorter than this never become annotations.
pub const MIN_ANNOTATION_SECS: f64 = 0.1;

/// Score bonus per `mark` entry in the engagement log.
pub const MARK_BONUS: f64 = 0.1;

/// Fraction of a phrase's significant words that must appear in order.
pub const PHRASE_MATCH_RATIO: f64 = 0.7;

/// Words of this length or shorter are ignored by fuzzy phrase matching.
pub const MAX_INSIGNIFICANT_WORD_LEN: usize = 2;

/// Annotation colours, assigned round-robin by creation order.
pub const ANNOTATION_PALETTE: [&str; 8] = [
    "rgba(0, 255, 136, 0.3)",
    "rgba(59, 130, 246, 0.3)",
    "rgba(168, 85, 247, 0.3)",
    "rgba(236, 72, 153, 0.3)",
    "rgba(251, 191, 36, 0.3)",
    "rgba(34, 197, 94, 0.3)",
    "rgba(249, 115, 22, 0.3)",
    "rgba(239, 68, 68, 0.3)",
];

pub const ROW_BACKGROUND_ALPHA: f64 = 0.2;
pub const ROW_BACKGROUND_FALLBACK: &str = "rgba(255,255,255,0.06)";

/// Bounded history kept by the console logger.
pub const CONSOLE_CAPACITY: usize = 500;

pub const TRANSCRIPTION_SAMPLE_RATE: u32 = 16000;
pub const MAX_TRANSCRIPTION_MB: f64 = 100.0;
