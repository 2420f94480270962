/// A borrowed BACnet bit string: the data octets plus the count of unused
/// bits in the final octet. Bit 0 is the most significant bit of the first
/// octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitString<'a> {
    pub unused_bits: u8,
    pub data: &'a [u8],
}

impl<'a> BitString<'a> {
    pub const fn new(unused_bits: u8, data: &'a [u8]) -> Self {
        Self { unused_bits, data }
    }

    pub const fn bit_count(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.unused_bits as usize)
    }

    pub fn bit(&self, index: usize) -> bool {
        if index >= self.bit_count() {
            return false;
        }
        self.data[index / 8] & (0x80 >> (index % 8)) != 0
    }
}
