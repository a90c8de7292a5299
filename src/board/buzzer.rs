//! Piezo on a PWM slice output.

use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use fixed::traits::ToFixed;

use tonepad::config::SYS_CLOCK_HZ;
use tonepad::tone::PwmSettings;
use tonepad::{Buzzer, Tone};

/// Buzzer on channel B of one slice. Silence is a zero compare value.
pub struct PwmBuzzer {
    pwm: Pwm<'static>,
    config: PwmConfig,
}

impl PwmBuzzer {
    pub fn new(pwm: Pwm<'static>) -> Self {
        let mut buzzer = Self {
            pwm,
            config: PwmConfig::default(),
        };
        buzzer.silence();
        buzzer
    }
}

impl Buzzer for PwmBuzzer {
    fn sound(&mut self, tone: Tone) {
        let Some(settings) = PwmSettings::for_frequency(SYS_CLOCK_HZ, u32::from(tone.hz())) else {
            defmt::warn!("Buzzer: {} Hz out of range", tone.hz());
            return;
        };
        self.config.divider = settings.divider.to_fixed();
        self.config.top = settings.top;
        self.config.compare_b = settings.compare;
        self.pwm.set_config(&self.config);
    }

    fn silence(&mut self) {
        self.config.compare_b = 0;
        self.pwm.set_config(&self.config);
    }
}
