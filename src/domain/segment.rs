//! SMS segment accounting: encoding detection, character counting, and
//! multi-part math.
//!
//! The gateway bills and splits messages according to GSM 03.38. A message
//! whose every character fits the GSM repertoire is sent on the 7-bit
//! alphabet; a single character outside it switches the whole message to
//! UCS-2 and roughly halves the per-segment budget. Commercial messages
//! additionally lose part of the first segment to the mandatory STOP clause.

/// GSM 03.38 base alphabet (7-bit, one character-unit each).
const GSM_BASE: &str = "@£$¥èéùìòÇ\nØø\rÅåΔ_ΦΓΛΩΠΨΣΘΞÆæßÉ !\"#¤%&'()*+,-./0123456789:;<=>?¡ABCDEFGHIJKLMNOPQRSTUVWXYZÄÖÑܧ¿abcdefghijklmnopqrstuvwxyzäöñüà";

/// GSM 03.38 extension table characters. Each needs an escape on the wire
/// and therefore counts as two character-units under GSM accounting.
const GSM_EXTENSION: &str = "€|^{}[]~\\";

/// Character encoding selected for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Every character fits the GSM 03.38 base or extension repertoire.
    Gsm,
    /// At least one character requires UCS-2.
    Unicode,
}

impl Encoding {
    /// Wire/label form of the encoding (`gsm` / `unicode`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gsm => "gsm",
            Self::Unicode => "unicode",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Read-only summary of how a message text splits into SMS segments.
///
/// Computed fresh by [`analyze`]; never mutated.
pub struct SegmentInfo {
    /// Character-units consumed (extension characters count twice under GSM).
    pub character_count: usize,
    /// Detected encoding.
    pub encoding: Encoding,
    /// Number of physical SMS segments required.
    pub segment_count: usize,
    /// Character-units still free in the last segment.
    pub remaining_in_last_segment: usize,
    /// Capacity of a single (first) segment for this encoding/commercial mix.
    pub max_single_segment: usize,
    /// Characters outside the GSM repertoire, de-duplicated, in order of
    /// first occurrence. Empty when `encoding` is [`Encoding::Gsm`].
    pub non_gsm_characters: Vec<char>,
}

fn is_gsm_base(c: char) -> bool {
    GSM_BASE.contains(c)
}

fn is_gsm_extension(c: char) -> bool {
    GSM_EXTENSION.contains(c)
}

/// First-segment and continuation-segment limits.
///
/// Concatenation headers shrink every continuation segment, and the STOP
/// clause appended to commercial traffic shrinks the first one further.
fn limits(encoding: Encoding, commercial: bool) -> (usize, usize) {
    match (encoding, commercial) {
        (Encoding::Gsm, true) => (149, 153),
        (Encoding::Gsm, false) => (160, 153),
        (Encoding::Unicode, true) => (59, 70),
        (Encoding::Unicode, false) => (70, 67),
    }
}

/// Analyze `text` and return its segment accounting.
///
/// Pure and total: empty text yields a zero count and a single segment.
pub fn analyze(text: &str, commercial: bool) -> SegmentInfo {
    let mut non_gsm = Vec::new();
    for c in text.chars() {
        if !is_gsm_base(c) && !is_gsm_extension(c) && !non_gsm.contains(&c) {
            non_gsm.push(c);
        }
    }

    let encoding = if non_gsm.is_empty() {
        Encoding::Gsm
    } else {
        Encoding::Unicode
    };

    let character_count = match encoding {
        Encoding::Gsm => text
            .chars()
            .map(|c| if is_gsm_extension(c) { 2 } else { 1 })
            .sum(),
        Encoding::Unicode => text.chars().count(),
    };

    let (first_limit, continuation_limit) = limits(encoding, commercial);

    let (segment_count, remaining_in_last_segment) = if character_count <= first_limit {
        (1, first_limit - character_count)
    } else {
        let extra = character_count - first_limit;
        let additional = extra.div_ceil(continuation_limit);
        (
            1 + additional,
            first_limit + additional * continuation_limit - character_count,
        )
    };

    SegmentInfo {
        character_count,
        encoding,
        segment_count,
        remaining_in_last_segment,
        max_single_segment: first_limit,
        non_gsm_characters: non_gsm,
    }
}
