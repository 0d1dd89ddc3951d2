pub const START_CODE: [u8; 3] = [0, 0, 1];

/// Escaped bytes of one NAL unit, header included, borrowed from the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NalSpan<'a> {
    /// Offset of the byte following the start code.
    pub offset: usize,
    pub data: &'a [u8],
}

impl NalSpan<'_> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Splits an Annex B byte stream on `00 00 01` start codes.
///
/// Bytes before the first start code are ignored. A unit extends up to the
/// next start code or the end of the buffer, so a zero byte preceding a
/// four-byte start code stays at the end of the previous unit.
#[derive(Debug, Clone)]
pub struct NalDemuxer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> NalDemuxer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl<'a> Iterator for NalDemuxer<'a> {
    type Item = NalSpan<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = find_start_code(self.data, self.pos)? + START_CODE.len();
        let end = find_start_code(self.data, start).unwrap_or(self.data.len());

        self.pos = end;

        Some(NalSpan {
            offset: start,
            data: &self.data[start..end],
        })
    }
}

/// Offset of the first start code at or after `from`.
pub fn find_start_code(data: &[u8], from: usize) -> Option<usize> {
    data.get(from..)?
        .windows(START_CODE.len())
        .position(|w| w == START_CODE)
        .map(|i| from + i)
}
