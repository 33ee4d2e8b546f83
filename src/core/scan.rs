// Frame scanning over raw shard buffers with 4-byte resynchronization.
//
// Shard files carry no index and no checksums, so record boundaries are
// not independently verifiable. The scanner walks the buffer word by
// word: a known marker opens a frame, anything else advances the offset
// by 4 bytes and retries. A frame whose declared size runs past the
// buffer is emitted clamped and the scan resumes one word past its
// marker. Offsets only ever move forward, which bounds the scan and
// keeps it from restarting at the same position.

pub const DEFAULT_PREAMBLE_LEN: usize = 8;

const ACCOUNT_TAG: u32 = 0x0000_0201;
const NAME_MAPPING_TAG: u32 = 0x0000_0301;
const BALANCE_TAG: u32 = 0x0000_0502;

/// Known composite frame tags. Each packs a `(space_id, type_id)` pair
/// into the low two bytes of a little-endian word.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RecordMarker {
    Account,
    NameMapping,
    Balance,
}

impl RecordMarker {
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            ACCOUNT_TAG => Some(RecordMarker::Account),
            NAME_MAPPING_TAG => Some(RecordMarker::NameMapping),
            BALANCE_TAG => Some(RecordMarker::Balance),
            _ => None,
        }
    }

    pub fn tag(self) -> u32 {
        match self {
            RecordMarker::Account => ACCOUNT_TAG,
            RecordMarker::NameMapping => NAME_MAPPING_TAG,
            RecordMarker::Balance => BALANCE_TAG,
        }
    }

    pub fn space_id(self) -> u8 {
        (self.tag() & 0xFF) as u8
    }

    pub fn type_id(self) -> u8 {
        ((self.tag() >> 8) & 0xFF) as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordMarker::Account => "account",
            RecordMarker::NameMapping => "name-mapping",
            RecordMarker::Balance => "balance",
        }
    }
}

/// One candidate record emitted by the scanner. `body` is clamped to
/// the end of the buffer; compare against `declared_len` to detect a
/// frame whose declared size ran past the data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Frame<'a> {
    pub marker: RecordMarker,
    pub offset: usize,
    pub declared_len: u32,
    pub body: &'a [u8],
}

impl Frame<'_> {
    pub fn is_truncated(&self) -> bool {
        self.declared_len as usize != self.body.len()
    }
}

/// Stateless forward scan over one buffer. Restart by constructing a
/// new scanner over the same bytes.
#[derive(Clone, Debug)]
pub struct Scanner<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_preamble(buf, DEFAULT_PREAMBLE_LEN)
    }

    /// `preamble_len` bytes are skipped unvalidated.
    pub fn with_preamble(buf: &'a [u8], preamble_len: usize) -> Self {
        Self {
            buf,
            offset: preamble_len,
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Frame<'a>> {
        loop {
            let remaining = self.buf.len().checked_sub(self.offset)?;
            if remaining < 4 {
                return None;
            }
            let Some(marker) = RecordMarker::from_tag(read_u32(self.buf, self.offset)) else {
                self.offset += 4;
                continue;
            };
            if remaining < 8 {
                return None;
            }
            let declared_len = read_u32(self.buf, self.offset + 4);
            let body_start = self.offset + 8;
            let body_avail = self.buf.len() - body_start;
            let truncated = declared_len as usize > body_avail;
            let body_end = if truncated {
                self.buf.len()
            } else {
                body_start + declared_len as usize
            };
            let frame = Frame {
                marker,
                offset: self.offset,
                declared_len,
                body: &self.buf[body_start..body_end],
            };
            // A declared size running past the buffer is not a trusted
            // boundary: resume one word past the marker so frames
            // inside the claimed region can still be found.
            self.offset = if truncated {
                self.offset + 4
            } else {
                body_start + declared_len as usize
            };
            return Some(frame);
        }
    }
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(word)
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_PREAMBLE_LEN, Frame, RecordMarker, Scanner};

    fn frame_bytes(marker: RecordMarker, body: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&marker.tag().to_le_bytes());
        out.extend_from_slice(&(body.len() as u32).to_le_bytes());
        out.extend_from_slice(body);
        out
    }

    fn shard_bytes(frames: &[Vec<u8>]) -> Vec<u8> {
        let mut out = vec![0u8; DEFAULT_PREAMBLE_LEN];
        for frame in frames {
            out.extend_from_slice(frame);
        }
        out
    }

    #[test]
    fn marker_tags_pack_space_and_type() {
        assert_eq!(RecordMarker::Account.space_id(), 1);
        assert_eq!(RecordMarker::Account.type_id(), 2);
        assert_eq!(RecordMarker::NameMapping.space_id(), 1);
        assert_eq!(RecordMarker::NameMapping.type_id(), 3);
        assert_eq!(RecordMarker::Balance.space_id(), 2);
        assert_eq!(RecordMarker::Balance.type_id(), 5);
        assert_eq!(RecordMarker::from_tag(0xDEAD_BEEF), None);
    }

    #[test]
    fn empty_and_preamble_only_buffers_yield_nothing() {
        assert_eq!(Scanner::new(&[]).count(), 0);
        assert_eq!(Scanner::new(&[0u8; 8]).count(), 0);
        assert_eq!(Scanner::new(&[0u8; 11]).count(), 0);
    }

    #[test]
    fn well_formed_frames_are_emitted_in_order() {
        let shard = shard_bytes(&[
            frame_bytes(RecordMarker::Account, b"first"),
            frame_bytes(RecordMarker::Balance, b"second"),
        ]);
        let frames: Vec<Frame<'_>> = Scanner::new(&shard).collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].marker, RecordMarker::Account);
        assert_eq!(frames[0].body, b"first");
        assert_eq!(frames[0].offset, 8);
        assert_eq!(frames[1].marker, RecordMarker::Balance);
        assert_eq!(frames[1].body, b"second");
    }

    #[test]
    fn unknown_words_are_skipped_word_by_word() {
        let mut shard = vec![0u8; DEFAULT_PREAMBLE_LEN];
        shard.extend_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
        shard.extend_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
        shard.extend_from_slice(&frame_bytes(RecordMarker::NameMapping, b"name"));
        let frames: Vec<Frame<'_>> = Scanner::new(&shard).collect();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].marker, RecordMarker::NameMapping);
        assert_eq!(frames[0].offset, 16);
    }

    #[test]
    fn oversized_declared_len_clamps_body_and_terminates() {
        let mut shard = vec![0u8; DEFAULT_PREAMBLE_LEN];
        shard.extend_from_slice(&RecordMarker::Account.tag().to_le_bytes());
        shard.extend_from_slice(&1000u32.to_le_bytes());
        shard.extend_from_slice(b"short");
        let frames: Vec<Frame<'_>> = Scanner::new(&shard).collect();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].declared_len, 1000);
        assert_eq!(frames[0].body, b"short");
        assert!(frames[0].is_truncated());
    }

    #[test]
    fn frames_inside_an_oversized_claim_are_recovered() {
        let mut shard = vec![0u8; DEFAULT_PREAMBLE_LEN];
        shard.extend_from_slice(&RecordMarker::Balance.tag().to_le_bytes());
        shard.extend_from_slice(&0x00FF_FFFFu32.to_le_bytes());
        shard.extend_from_slice(&frame_bytes(RecordMarker::Account, b"body"));
        let frames: Vec<Frame<'_>> = Scanner::new(&shard).collect();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].is_truncated());
        assert_eq!(frames[1].marker, RecordMarker::Account);
        assert_eq!(frames[1].body, b"body");
        assert!(!frames[1].is_truncated());
    }

    #[test]
    fn truncated_size_word_stops_cleanly() {
        let mut shard = vec![0u8; DEFAULT_PREAMBLE_LEN];
        shard.extend_from_slice(&RecordMarker::Balance.tag().to_le_bytes());
        shard.extend_from_slice(&[0x01, 0x00]);
        assert_eq!(Scanner::new(&shard).count(), 0);
    }

    #[test]
    fn max_declared_len_does_not_overflow() {
        let mut shard = vec![0u8; DEFAULT_PREAMBLE_LEN];
        shard.extend_from_slice(&RecordMarker::Account.tag().to_le_bytes());
        shard.extend_from_slice(&u32::MAX.to_le_bytes());
        shard.extend_from_slice(b"tail");
        let frames: Vec<Frame<'_>> = Scanner::new(&shard).collect();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].body, b"tail");
    }

    #[test]
    fn scan_is_restartable_over_the_same_buffer() {
        let shard = shard_bytes(&[frame_bytes(RecordMarker::Account, b"body")]);
        let first: Vec<Frame<'_>> = Scanner::new(&shard).collect();
        let second: Vec<Frame<'_>> = Scanner::new(&shard).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn preamble_longer_than_buffer_is_safe() {
        assert_eq!(Scanner::with_preamble(b"abc", 16).count(), 0);
    }
}
