pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(src: &'a str) -> Self {
        Reader {
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    pub fn next(&mut self) -> Option<u8> {
        let c = self.bytes.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    // Steps back over the most recently read byte. Repeated calls back out
    // a longer run, which the `else` probe relies on.
    pub fn unget(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }
}
