use crate::{
    register::BitFlags, Gain, IntegrationTime, Persistence, PowerSavingMode, ToRegisterValue,
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Configuration {
    // ALS_CONF
    pub(crate) gain: Gain,
    pub(crate) integration_time: IntegrationTime,
    pub(crate) persistence: Persistence,

    // PSM
    pub(crate) power_saving_mode: PowerSavingMode,

    // host-side scaling, not written to the device
    pub(crate) attenuation_factor: f32,
}

impl Configuration {
    /// Encodes the ALS_CONF register word. Shutdown and interrupt enable are
    /// always cleared, reserved bits stay zero.
    pub fn als_conf_reg_value(&self) -> u16 {
        (self.persistence.register_value() & BitFlags::ALS_CONF_PERS_MASK)
            << BitFlags::ALS_CONF_PERS_SHIFT
            | (self.integration_time.register_value() & BitFlags::ALS_CONF_IT_MASK)
                << BitFlags::ALS_CONF_IT_SHIFT
            | (self.gain.register_value() & BitFlags::ALS_CONF_GAIN_MASK)
                << BitFlags::ALS_CONF_GAIN_SHIFT
    }

    /// Encodes the PSM register word. Power saving stays disabled, only the
    /// mode bits are filled in.
    pub fn psm_reg_value(&self) -> u16 {
        (self.power_saving_mode.register_value() & BitFlags::PSM_MODE_MASK)
            << BitFlags::PSM_MODE_SHIFT
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            gain: Gain::X1,
            integration_time: IntegrationTime::Ms100,
            persistence: Persistence::One,
            power_saving_mode: PowerSavingMode::Mode1,
            attenuation_factor: 1.0,
        }
    }
}

/// Decodes the semantic fields of an ALS_CONF register word. Unknown
/// integration time codes fall back to 100ms.
pub(crate) fn decode_als_conf(raw: u16) -> (Gain, IntegrationTime, Persistence) {
    (
        Gain::from_code((raw >> BitFlags::ALS_CONF_GAIN_SHIFT) & BitFlags::ALS_CONF_GAIN_MASK),
        IntegrationTime::from_code((raw >> BitFlags::ALS_CONF_IT_SHIFT) & BitFlags::ALS_CONF_IT_MASK),
        Persistence::from_code((raw >> BitFlags::ALS_CONF_PERS_SHIFT) & BitFlags::ALS_CONF_PERS_MASK),
    )
}

macro_rules! builder_property {
    ($field:ident, $field_type:path, $doc:literal) => {
        #[doc = $doc]
        pub fn $field(mut self, $field: $field_type) -> Self {
            self.configuration.$field = $field;
            self
        }
    };
}

/// Builder for the device configuration.
///
/// All settings are fixed once the driver is constructed; there is no
/// runtime reconfiguration.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    pub(crate) configuration: Configuration,
}

impl ConfigBuilder {
    /// Create a configuration with the device defaults: gain x1, 100ms
    /// integration time, persistence 1, power saving mode 1 (disabled),
    /// attenuation factor 1.0.
    pub fn new() -> Self {
        Self::default()
    }

    builder_property!(gain, Gain, "ALS gain selection");
    builder_property!(
        integration_time,
        IntegrationTime,
        "ALS integration time setting"
    );
    builder_property!(
        persistence,
        Persistence,
        "ALS interrupt persistence setting (thresholds are disabled by this driver)"
    );
    builder_property!(
        power_saving_mode,
        PowerSavingMode,
        "Power saving mode bits (power saving itself is always written disabled)"
    );
    builder_property!(
        attenuation_factor,
        f32,
        "Scaling factor applied to published lux values, e.g. for a cover glass"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let builder = ConfigBuilder::new()
            .gain(Gain::X1_4)
            .integration_time(IntegrationTime::Ms800)
            .attenuation_factor(1.5);

        assert_eq!(builder.configuration.gain, Gain::X1_4);
        assert_eq!(
            builder.configuration.integration_time,
            IntegrationTime::Ms800
        );
        assert_eq!(builder.configuration.persistence, Persistence::One);
        assert_eq!(builder.configuration.attenuation_factor, 1.5);
    }

    #[test]
    fn als_conf_default_encoding() {
        // gain x1 (00), 100ms (0000), persistence 1 (00), everything else 0
        let config = Configuration::default();
        assert_eq!(config.als_conf_reg_value(), 0x0000);
    }

    #[test]
    fn als_conf_field_placement() {
        let config = Configuration {
            gain: Gain::X1_4,
            integration_time: IntegrationTime::Ms25,
            persistence: Persistence::Eight,
            ..Configuration::default()
        };

        let raw = config.als_conf_reg_value();
        assert_eq!(raw, 0b11 << 11 | 0b1100 << 6 | 0b11 << 4);
        // shutdown, interrupt enable and reserved bits stay clear
        assert_eq!(raw & 0b1110_0100_0000_1111, 0);
    }

    #[test]
    fn als_conf_round_trips() {
        let gains = [Gain::X1, Gain::X2, Gain::X1_8, Gain::X1_4];
        let times = [
            IntegrationTime::Ms25,
            IntegrationTime::Ms50,
            IntegrationTime::Ms100,
            IntegrationTime::Ms200,
            IntegrationTime::Ms400,
            IntegrationTime::Ms800,
        ];
        let persistences = [
            Persistence::One,
            Persistence::Two,
            Persistence::Four,
            Persistence::Eight,
        ];

        for gain in gains {
            for integration_time in times {
                for persistence in persistences {
                    let config = Configuration {
                        gain,
                        integration_time,
                        persistence,
                        ..Configuration::default()
                    };

                    let decoded = decode_als_conf(config.als_conf_reg_value());
                    assert_eq!(decoded, (gain, integration_time, persistence));
                }
            }
        }
    }

    #[test]
    fn psm_is_always_disabled() {
        for mode in [
            PowerSavingMode::Mode1,
            PowerSavingMode::Mode2,
            PowerSavingMode::Mode3,
            PowerSavingMode::Mode4,
        ] {
            let config = Configuration {
                power_saving_mode: mode,
                ..Configuration::default()
            };

            let raw = config.psm_reg_value();
            assert_eq!(raw & BitFlags::PSM_EN, 0);
            assert_eq!(raw >> BitFlags::PSM_MODE_SHIFT, mode.register_value());
            // reserved bits 3..15 stay clear
            assert_eq!(raw & !0b111, 0);
        }
    }
}
