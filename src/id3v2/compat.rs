use crate::err::{ParseError, ParseResult};
use crate::frames::FrameId;

/// ID3v2.2 identifiers and their 4-character equivalents. Only identifiers
/// the dictionaries know appear here; anything else is skipped as unknown.
const V2_V3_CONV: &[(&[u8; 3], &[u8; 4])] = &[
    (b"COM", b"COMM"), // Comment
    (b"IPL", b"IPLS"), // Involved people list
    (b"MCI", b"MCDI"), // Music CD identifier
    (b"PIC", b"APIC"), // Attached picture
    (b"UFI", b"UFID"), // Unique file identifer
    (b"TAL", b"TALB"), // Album/Movie/Show title
    (b"TBP", b"TBPM"), // BPM
    (b"TCM", b"TCOM"), // Composer
    (b"TCO", b"TCON"), // Content type
    (b"TCR", b"TCOP"), // Copyright message
    (b"TDA", b"TDAT"), // Date
    (b"TDY", b"TDLY"), // Playlist delay
    (b"TEN", b"TENC"), // Encoded by
    (b"TFT", b"TFLT"), // File type
    (b"TIM", b"TIME"), // Recording time
    (b"TKE", b"TKEY"), // Initial key
    (b"TLA", b"TLAN"), // Language(s)
    (b"TLE", b"TLEN"), // Length
    (b"TMT", b"TMED"), // Media type
    (b"TOA", b"TOPE"), // Original artist(s)/performer(s)
    (b"TOF", b"TOFN"), // Original filename
    (b"TOL", b"TOLY"), // Original lyricist(s)/text writer(s)
    (b"TOR", b"TORY"), // Original release year
    (b"TOT", b"TOAL"), // Original album/movie/show title
    (b"TP1", b"TPE1"), // Lead artist(s)/performing group
    (b"TP2", b"TPE2"), // Band/Orchestra/Accompaniment
    (b"TP3", b"TPE3"), // Conductor/performer refinement
    (b"TP4", b"TPE4"), // Interpreted, remixed, or otherwise modified by
    (b"TPA", b"TPOS"), // Part of a set
    (b"TPB", b"TPUB"), // Publisher
    (b"TRC", b"TSRC"), // ISRC
    (b"TRD", b"TRDA"), // Recording dates
    (b"TRK", b"TRCK"), // Track
    (b"TSI", b"TSIZ"), // Size
    (b"TSS", b"TSSE"), // Software/hardware and settings used for encoding
    (b"TT1", b"TIT1"), // Content group description
    (b"TT2", b"TIT2"), // Title/Songname/Content description
    (b"TT3", b"TIT3"), // Subtitle/Description refinement
    (b"TXT", b"TEXT"), // Lyricist/text writer
    (b"TXX", b"TXXX"), // User-defined text
    (b"TYE", b"TYER"), // Year
    (b"WAF", b"WOAF"), // Official audio file webpage
    (b"WAR", b"WOAR"), // Official artist/performer webpage
    (b"WAS", b"WOAS"), // Official audio source webpage
    (b"WCM", b"WCOM"), // Commercial information
    (b"WCP", b"WCOP"), // Copyright information
    (b"WPB", b"WPUB"), // Publishers official webpage
    (b"WXX", b"WXXX"), // User-defined URL
    // iTunes proprietary frames
    (b"PCS", b"PCST"),
    (b"TCT", b"TCAT"),
    (b"TDR", b"TDRL"),
    (b"TDS", b"TDES"),
    (b"TID", b"TGID"),
    (b"WFD", b"WFED"),
];

/// Upgrade an ID3v2.2 identifier to its 4-character form.
pub(crate) fn upgrade_v2_id(id: &[u8; 3]) -> ParseResult<FrameId> {
    // Walk the list of pairs until an ID matches
    for (v2_id, v3_id) in V2_V3_CONV {
        if *v2_id == id {
            return Ok(FrameId::new(v3_id));
        }
    }

    // No dice.
    Err(ParseError::Unsupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upgrade_known_ids() {
        assert_eq!(upgrade_v2_id(b"TT2").unwrap(), FrameId::new(b"TIT2"));
        assert_eq!(upgrade_v2_id(b"PIC").unwrap(), FrameId::new(b"APIC"));
        assert_eq!(upgrade_v2_id(b"WXX").unwrap(), FrameId::new(b"WXXX"));
        assert_eq!(upgrade_v2_id(b"PCS").unwrap(), FrameId::new(b"PCST"));
    }

    #[test]
    fn unknown_ids_fail() {
        assert!(upgrade_v2_id(b"CRM").is_err());
        assert!(upgrade_v2_id(b"ZZZ").is_err());
    }
}
