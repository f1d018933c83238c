/// VEML7700 command registers
///
/// Datasheet: <https://www.vishay.com/docs/84286/veml7700.pdf>
///
/// All registers are 16 bit wide, transferred least significant byte first
/// and addressed by a single command code byte.
pub struct Register;
#[allow(dead_code)]
impl Register {
    /// ALS gain, integration time, persistence, interrupt and shutdown
    pub const ALS_CONF: u8 = 0x00;
    /// ALS high threshold window setting
    pub const ALS_WH: u8 = 0x01;
    /// ALS low threshold window setting
    pub const ALS_WL: u8 = 0x02;
    /// Power saving mode
    pub const PSM: u8 = 0x03;
    /// ALS raw counts (read-only)
    pub const ALS: u8 = 0x04;
    /// White channel raw counts (read-only)
    pub const WHITE: u8 = 0x05;
    /// ALS interrupt trigger event (read-only, unused by this driver)
    pub const ALS_INT: u8 = 0x06;
}

/// Bitfield layout of the writable registers.
///
/// All bits not covered by a flag or a shift/mask pair are reserved and must
/// stay zero.
pub struct BitFlags;
#[allow(dead_code)]
impl BitFlags {
    pub const ALS_CONF_SD: u16 = 1 << 0;
    pub const ALS_CONF_INT_EN: u16 = 1 << 1;
    pub const ALS_CONF_PERS_SHIFT: u16 = 4;
    pub const ALS_CONF_PERS_MASK: u16 = 0b11;
    pub const ALS_CONF_IT_SHIFT: u16 = 6;
    pub const ALS_CONF_IT_MASK: u16 = 0b1111;
    pub const ALS_CONF_GAIN_SHIFT: u16 = 11;
    pub const ALS_CONF_GAIN_MASK: u16 = 0b11;

    pub const PSM_EN: u16 = 1 << 0;
    pub const PSM_MODE_SHIFT: u16 = 1;
    pub const PSM_MODE_MASK: u16 = 0b11;
}
