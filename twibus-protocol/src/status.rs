//! TWI status codes
//!
//! The status register reports the last completed bus event in bits 7..3;
//! bits 1..0 hold the clock prescaler and are masked off before decoding.
//! The numeric codes are fixed by the peripheral and shared with every
//! TWI/I2C bus analyzer, so they must not change.

/// Mask selecting the status bits of the status register
pub const STATUS_MASK: u8 = 0xF8;

// Wire format values
const BUS_ERROR: u8 = 0x00;
const START: u8 = 0x08;
const REPEATED_START: u8 = 0x10;
const ADDRESS_WRITE_ACK: u8 = 0x18;
const ADDRESS_WRITE_NACK: u8 = 0x20;
const DATA_WRITE_ACK: u8 = 0x28;
const DATA_WRITE_NACK: u8 = 0x30;
const ARBITRATION_LOST: u8 = 0x38;
const ADDRESS_READ_ACK: u8 = 0x40;
const ADDRESS_READ_NACK: u8 = 0x48;
const DATA_READ_ACK: u8 = 0x50;
const DATA_READ_NACK: u8 = 0x58;
const OWN_ADDRESS_RECEIVED: u8 = 0x60;
const OWN_ADDRESS_AFTER_ARBITRATION: u8 = 0x68;
const GENERAL_CALL_RECEIVED: u8 = 0x70;
const GENERAL_CALL_AFTER_ARBITRATION: u8 = 0x78;
const ADDRESSED_DATA_ACK: u8 = 0x80;
const ADDRESSED_DATA_NACK: u8 = 0x88;
const GENERAL_CALL_DATA_ACK: u8 = 0x90;
const GENERAL_CALL_DATA_NACK: u8 = 0x98;
const STOP_RECEIVED: u8 = 0xA0;
const OWN_ADDRESS_READ_ACK: u8 = 0xA8;
const OWN_ADDRESS_READ_AFTER_ARBITRATION: u8 = 0xB0;
const SLAVE_DATA_SENT_ACK: u8 = 0xB8;
const SLAVE_DATA_SENT_NACK: u8 = 0xC0;
const SLAVE_LAST_DATA_SENT_ACK: u8 = 0xC8;
const NO_INFORMATION: u8 = 0xF8;

/// Bus event reported by the status register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusStatusCode {
    /// Illegal START or STOP detected on the bus
    BusError,
    /// START condition sent
    Start,
    /// Repeated START condition sent
    RepeatedStart,
    /// Address + write sent, ACK received
    AddressWriteAck,
    /// Address + write sent, NACK received
    AddressWriteNack,
    /// Data byte sent, ACK received
    DataWriteAck,
    /// Data byte sent, NACK received
    DataWriteNack,
    /// Arbitration lost in address or data phase
    ArbitrationLost,
    /// Address + read sent, ACK received
    AddressReadAck,
    /// Address + read sent, NACK received
    AddressReadNack,
    /// Data byte received, ACK returned
    DataReadAck,
    /// Data byte received, NACK returned
    DataReadNack,
    /// Own address + write received, ACK returned
    OwnAddressReceived,
    /// Arbitration lost as master; own address + write received
    OwnAddressAfterArbitration,
    /// General call received, ACK returned
    GeneralCallReceived,
    /// Arbitration lost as master; general call received
    GeneralCallAfterArbitration,
    /// Addressed as slave; data received, ACK returned
    AddressedDataAck,
    /// Addressed as slave; data received, NACK returned
    AddressedDataNack,
    /// General call; data received, ACK returned
    GeneralCallDataAck,
    /// General call; data received, NACK returned
    GeneralCallDataNack,
    /// STOP or repeated START received while addressed as slave
    StopReceived,
    /// Own address + read received, ACK returned
    OwnAddressReadAck,
    /// Arbitration lost as master; own address + read received
    OwnAddressReadAfterArbitration,
    /// Slave data byte sent, ACK received
    SlaveDataSentAck,
    /// Slave data byte sent, NACK received
    SlaveDataSentNack,
    /// Last slave data byte sent, ACK received
    SlaveLastDataSentAck,
    /// No relevant state information; TWINT not set
    NoInformation,
}

impl BusStatusCode {
    /// Every status code, in wire order
    pub const ALL: [Self; 27] = [
        Self::BusError,
        Self::Start,
        Self::RepeatedStart,
        Self::AddressWriteAck,
        Self::AddressWriteNack,
        Self::DataWriteAck,
        Self::DataWriteNack,
        Self::ArbitrationLost,
        Self::AddressReadAck,
        Self::AddressReadNack,
        Self::DataReadAck,
        Self::DataReadNack,
        Self::OwnAddressReceived,
        Self::OwnAddressAfterArbitration,
        Self::GeneralCallReceived,
        Self::GeneralCallAfterArbitration,
        Self::AddressedDataAck,
        Self::AddressedDataNack,
        Self::GeneralCallDataAck,
        Self::GeneralCallDataNack,
        Self::StopReceived,
        Self::OwnAddressReadAck,
        Self::OwnAddressReadAfterArbitration,
        Self::SlaveDataSentAck,
        Self::SlaveDataSentNack,
        Self::SlaveLastDataSentAck,
        Self::NoInformation,
    ];

    /// Parse a status code from its wire format byte
    ///
    /// The byte must already be masked with [`STATUS_MASK`].
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            BUS_ERROR => Some(Self::BusError),
            START => Some(Self::Start),
            REPEATED_START => Some(Self::RepeatedStart),
            ADDRESS_WRITE_ACK => Some(Self::AddressWriteAck),
            ADDRESS_WRITE_NACK => Some(Self::AddressWriteNack),
            DATA_WRITE_ACK => Some(Self::DataWriteAck),
            DATA_WRITE_NACK => Some(Self::DataWriteNack),
            ARBITRATION_LOST => Some(Self::ArbitrationLost),
            ADDRESS_READ_ACK => Some(Self::AddressReadAck),
            ADDRESS_READ_NACK => Some(Self::AddressReadNack),
            DATA_READ_ACK => Some(Self::DataReadAck),
            DATA_READ_NACK => Some(Self::DataReadNack),
            OWN_ADDRESS_RECEIVED => Some(Self::OwnAddressReceived),
            OWN_ADDRESS_AFTER_ARBITRATION => Some(Self::OwnAddressAfterArbitration),
            GENERAL_CALL_RECEIVED => Some(Self::GeneralCallReceived),
            GENERAL_CALL_AFTER_ARBITRATION => Some(Self::GeneralCallAfterArbitration),
            ADDRESSED_DATA_ACK => Some(Self::AddressedDataAck),
            ADDRESSED_DATA_NACK => Some(Self::AddressedDataNack),
            GENERAL_CALL_DATA_ACK => Some(Self::GeneralCallDataAck),
            GENERAL_CALL_DATA_NACK => Some(Self::GeneralCallDataNack),
            STOP_RECEIVED => Some(Self::StopReceived),
            OWN_ADDRESS_READ_ACK => Some(Self::OwnAddressReadAck),
            OWN_ADDRESS_READ_AFTER_ARBITRATION => Some(Self::OwnAddressReadAfterArbitration),
            SLAVE_DATA_SENT_ACK => Some(Self::SlaveDataSentAck),
            SLAVE_DATA_SENT_NACK => Some(Self::SlaveDataSentNack),
            SLAVE_LAST_DATA_SENT_ACK => Some(Self::SlaveLastDataSentAck),
            NO_INFORMATION => Some(Self::NoInformation),
            _ => None,
        }
    }

    /// Decode a raw status register value, prescaler bits included
    pub fn from_register(raw: u8) -> Option<Self> {
        Self::from_byte(raw & STATUS_MASK)
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Self::BusError => BUS_ERROR,
            Self::Start => START,
            Self::RepeatedStart => REPEATED_START,
            Self::AddressWriteAck => ADDRESS_WRITE_ACK,
            Self::AddressWriteNack => ADDRESS_WRITE_NACK,
            Self::DataWriteAck => DATA_WRITE_ACK,
            Self::DataWriteNack => DATA_WRITE_NACK,
            Self::ArbitrationLost => ARBITRATION_LOST,
            Self::AddressReadAck => ADDRESS_READ_ACK,
            Self::AddressReadNack => ADDRESS_READ_NACK,
            Self::DataReadAck => DATA_READ_ACK,
            Self::DataReadNack => DATA_READ_NACK,
            Self::OwnAddressReceived => OWN_ADDRESS_RECEIVED,
            Self::OwnAddressAfterArbitration => OWN_ADDRESS_AFTER_ARBITRATION,
            Self::GeneralCallReceived => GENERAL_CALL_RECEIVED,
            Self::GeneralCallAfterArbitration => GENERAL_CALL_AFTER_ARBITRATION,
            Self::AddressedDataAck => ADDRESSED_DATA_ACK,
            Self::AddressedDataNack => ADDRESSED_DATA_NACK,
            Self::GeneralCallDataAck => GENERAL_CALL_DATA_ACK,
            Self::GeneralCallDataNack => GENERAL_CALL_DATA_NACK,
            Self::StopReceived => STOP_RECEIVED,
            Self::OwnAddressReadAck => OWN_ADDRESS_READ_ACK,
            Self::OwnAddressReadAfterArbitration => OWN_ADDRESS_READ_AFTER_ARBITRATION,
            Self::SlaveDataSentAck => SLAVE_DATA_SENT_ACK,
            Self::SlaveDataSentNack => SLAVE_DATA_SENT_NACK,
            Self::SlaveLastDataSentAck => SLAVE_LAST_DATA_SENT_ACK,
            Self::NoInformation => NO_INFORMATION,
        }
    }

    /// Datasheet mnemonic, for diagnostics
    pub fn name(self) -> &'static str {
        match self {
            Self::BusError => "BUS_ERROR",
            Self::Start => "START",
            Self::RepeatedStart => "RE_START",
            Self::AddressWriteAck => "MT_SLA_W_ACK",
            Self::AddressWriteNack => "MT_SLA_W_NACK",
            Self::DataWriteAck => "MT_DATA_ACK",
            Self::DataWriteNack => "MT_DATA_NACK",
            Self::ArbitrationLost => "ARB_LOST",
            Self::AddressReadAck => "MR_SLA_R_ACK",
            Self::AddressReadNack => "MR_SLA_R_NACK",
            Self::DataReadAck => "MR_DATA_ACK",
            Self::DataReadNack => "MR_DATA_NACK",
            Self::OwnAddressReceived => "SR_SLA_W_ACK",
            Self::OwnAddressAfterArbitration => "SR_ARB_LOST_SLA_W_ACK",
            Self::GeneralCallReceived => "SR_GCALL_ACK",
            Self::GeneralCallAfterArbitration => "SR_ARB_LOST_GCALL_ACK",
            Self::AddressedDataAck => "SR_DATA_ACK",
            Self::AddressedDataNack => "SR_DATA_NACK",
            Self::GeneralCallDataAck => "SR_GCALL_DATA_ACK",
            Self::GeneralCallDataNack => "SR_GCALL_DATA_NACK",
            Self::StopReceived => "SR_STOP",
            Self::OwnAddressReadAck => "ST_SLA_R_ACK",
            Self::OwnAddressReadAfterArbitration => "ST_ARB_LOST_SLA_R_ACK",
            Self::SlaveDataSentAck => "ST_DATA_ACK",
            Self::SlaveDataSentNack => "ST_DATA_NACK",
            Self::SlaveLastDataSentAck => "ST_LAST_DATA",
            Self::NoInformation => "NO_INFO",
        }
    }

    /// One-line human readable description
    pub fn description(self) -> &'static str {
        match self {
            Self::BusError => "bus error: illegal START or STOP",
            Self::Start => "START sent",
            Self::RepeatedStart => "repeated START sent",
            Self::AddressWriteAck => "address+write acknowledged",
            Self::AddressWriteNack => "address+write not acknowledged",
            Self::DataWriteAck => "data sent, acknowledged",
            Self::DataWriteNack => "data sent, not acknowledged",
            Self::ArbitrationLost => "arbitration lost",
            Self::AddressReadAck => "address+read acknowledged",
            Self::AddressReadNack => "address+read not acknowledged",
            Self::DataReadAck => "data received, ACK returned",
            Self::DataReadNack => "data received, NACK returned",
            Self::OwnAddressReceived => "own address received",
            Self::OwnAddressAfterArbitration => "own address received after arbitration lost",
            Self::GeneralCallReceived => "general call received",
            Self::GeneralCallAfterArbitration => "general call received after arbitration lost",
            Self::AddressedDataAck => "slave data received, ACK returned",
            Self::AddressedDataNack => "slave data received, NACK returned",
            Self::GeneralCallDataAck => "general call data received, ACK returned",
            Self::GeneralCallDataNack => "general call data received, NACK returned",
            Self::StopReceived => "STOP received",
            Self::OwnAddressReadAck => "own address+read received",
            Self::OwnAddressReadAfterArbitration => {
                "own address+read received after arbitration lost"
            }
            Self::SlaveDataSentAck => "slave data sent, acknowledged",
            Self::SlaveDataSentNack => "slave data sent, not acknowledged",
            Self::SlaveLastDataSentAck => "last slave data sent, acknowledged",
            Self::NoInformation => "no relevant state information",
        }
    }

    /// Returns true if this is an own-address or general call match
    pub fn is_slave_address_match(self) -> bool {
        matches!(
            self,
            Self::OwnAddressReceived
                | Self::OwnAddressAfterArbitration
                | Self::GeneralCallReceived
                | Self::GeneralCallAfterArbitration
        )
    }

    /// Returns true if a slave data byte was received and acknowledged
    pub fn is_slave_data_ack(self) -> bool {
        matches!(self, Self::AddressedDataAck | Self::GeneralCallDataAck)
    }

    /// Returns true if the master lost arbitration, whether or not it was
    /// addressed as a slave afterwards
    pub fn is_arbitration_lost(self) -> bool {
        matches!(
            self,
            Self::ArbitrationLost
                | Self::OwnAddressAfterArbitration
                | Self::GeneralCallAfterArbitration
                | Self::OwnAddressReadAfterArbitration
        )
    }

    /// Returns true if the addressed target did not acknowledge
    pub fn is_address_nack(self) -> bool {
        matches!(self, Self::AddressWriteNack | Self::AddressReadNack)
    }

    /// Returns true if a data byte was not acknowledged
    pub fn is_data_nack(self) -> bool {
        matches!(
            self,
            Self::DataWriteNack
                | Self::DataReadNack
                | Self::AddressedDataNack
                | Self::GeneralCallDataNack
                | Self::SlaveDataSentNack
        )
    }
}

impl core::fmt::Display for BusStatusCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} (0x{:02X})", self.name(), self.to_byte())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wire_codes() {
        assert_eq!(BusStatusCode::Start.to_byte(), 0x08);
        assert_eq!(BusStatusCode::RepeatedStart.to_byte(), 0x10);
        assert_eq!(BusStatusCode::AddressWriteAck.to_byte(), 0x18);
        assert_eq!(BusStatusCode::AddressWriteNack.to_byte(), 0x20);
        assert_eq!(BusStatusCode::DataWriteAck.to_byte(), 0x28);
        assert_eq!(BusStatusCode::DataWriteNack.to_byte(), 0x30);
        assert_eq!(BusStatusCode::ArbitrationLost.to_byte(), 0x38);
        assert_eq!(BusStatusCode::AddressReadAck.to_byte(), 0x40);
        assert_eq!(BusStatusCode::AddressReadNack.to_byte(), 0x48);
        assert_eq!(BusStatusCode::DataReadAck.to_byte(), 0x50);
        assert_eq!(BusStatusCode::DataReadNack.to_byte(), 0x58);
        assert_eq!(BusStatusCode::OwnAddressReceived.to_byte(), 0x60);
        assert_eq!(BusStatusCode::GeneralCallReceived.to_byte(), 0x70);
        assert_eq!(BusStatusCode::AddressedDataAck.to_byte(), 0x80);
        assert_eq!(BusStatusCode::AddressedDataNack.to_byte(), 0x88);
        assert_eq!(BusStatusCode::GeneralCallDataAck.to_byte(), 0x90);
        assert_eq!(BusStatusCode::GeneralCallDataNack.to_byte(), 0x98);
        assert_eq!(BusStatusCode::StopReceived.to_byte(), 0xA0);
    }

    #[test]
    fn test_prescaler_bits_ignored() {
        assert_eq!(
            BusStatusCode::from_register(0x08 | 0x03),
            Some(BusStatusCode::Start)
        );
        assert_eq!(
            BusStatusCode::from_register(0x61),
            Some(BusStatusCode::OwnAddressReceived)
        );
    }

    #[test]
    fn test_unassigned_code() {
        assert_eq!(BusStatusCode::from_byte(0xD0), None);
        assert_eq!(BusStatusCode::from_register(0xE8), None);
    }

    #[test]
    fn test_display() {
        let text = std::format!("{}", BusStatusCode::DataReadNack);
        assert_eq!(text, "MR_DATA_NACK (0x58)");
    }

    #[test]
    fn test_slave_classification() {
        assert!(BusStatusCode::OwnAddressReceived.is_slave_address_match());
        assert!(BusStatusCode::GeneralCallAfterArbitration.is_slave_address_match());
        assert!(!BusStatusCode::AddressedDataAck.is_slave_address_match());
        assert!(BusStatusCode::GeneralCallDataAck.is_slave_data_ack());
        assert!(!BusStatusCode::GeneralCallDataNack.is_slave_data_ack());
        assert!(BusStatusCode::AddressReadNack.is_address_nack());
        assert!(BusStatusCode::DataWriteNack.is_data_nack());
    }

    proptest! {
        #[test]
        fn prop_decoded_codes_encode_to_masked_byte(raw in any::<u8>()) {
            if let Some(code) = BusStatusCode::from_register(raw) {
                prop_assert_eq!(code.to_byte(), raw & STATUS_MASK);
            }
        }

        #[test]
        fn prop_every_code_decodes_with_any_prescaler(index in 0usize..27, prescaler in 0u8..4) {
            let code = BusStatusCode::ALL[index];
            prop_assert_eq!(BusStatusCode::from_register(code.to_byte() | prescaler), Some(code));
        }
    }
}
