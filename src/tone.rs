//! Tones, sequences and the tone board.
//!
//! A [`Tone`] is one frequency from the fixed [`PALETTE`]. A [`Sequence`]
//! is one round's tones; it is built once and never changed afterwards.
//! The [`ToneBoard`] drives a [`Buzzer`] through a sequence, blocking for
//! the full playback time.

use alloc::vec::Vec;
use core::fmt;

use embedded_hal_async::delay::DelayNs;
use rand::{Rng, RngCore};

use crate::config::{
    BASE_SEQUENCE_LEN, BUZZER_DUTY_PERCENT, PALETTE, SCORE_STEP, TONE_DURATION_MS, TONE_GAP_MS,
};

/// A single palette frequency in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tone(u16);

impl Tone {
    pub const fn from_hz(hz: u16) -> Self {
        Self(hz)
    }

    pub const fn hz(self) -> u16 {
        self.0
    }

    /// Position of this tone in the palette, if it is a palette tone.
    pub fn palette_index(self) -> Option<usize> {
        PALETTE.iter().position(|t| *t == self)
    }

    /// Interpret one element of a server-provided sequence.
    ///
    /// The server sends key indices in the remote key space (`5..=11`);
    /// plain palette frequencies are accepted as they are. Anything else
    /// has no tone.
    pub fn from_remote(value: u16) -> Option<Tone> {
        let first = u16::from(crate::config::FIRST_TONE_KEY);
        if let Some(index) = value.checked_sub(first) {
            if let Some(tone) = PALETTE.get(usize::from(index)) {
                return Some(*tone);
            }
        }
        PALETTE.iter().copied().find(|t| t.hz() == value)
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}

/// Sequence length for a given score: `3 + score / 10`.
pub fn sequence_len(score: u32) -> usize {
    BASE_SEQUENCE_LEN + (score / SCORE_STEP) as usize
}

/// One round's tones. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence(Vec<Tone>);

impl Sequence {
    /// Draw a fresh sequence for `score`: every element is an independent
    /// uniform pick from the palette.
    pub fn generate<R: RngCore>(score: u32, rng: &mut R) -> Self {
        let len = sequence_len(score);
        let tones = (0..len)
            .map(|_| PALETTE[rng.gen_range(0..PALETTE.len())])
            .collect();
        Self(tones)
    }

    /// Wrap tones received from elsewhere (the server, tests).
    pub fn from_tones(tones: Vec<Tone>) -> Self {
        Self(tones)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tones(&self) -> &[Tone] {
        &self.0
    }

    /// Element-wise comparison against what the player entered.
    pub fn matches(&self, entered: &[Tone]) -> bool {
        self.0.as_slice() == entered
    }
}

/// Piezo output.
///
/// Implemented by the board on top of a PWM channel; fakes record calls.
pub trait Buzzer {
    /// Start sounding `tone` until [`Buzzer::silence`] is called.
    fn sound(&mut self, tone: Tone);

    /// Stop any tone.
    fn silence(&mut self);
}

/// Plays tones on a buzzer with fixed tone/gap timing.
pub struct ToneBoard<B, D> {
    buzzer: B,
    delay: D,
}

impl<B: Buzzer, D: DelayNs> ToneBoard<B, D> {
    pub fn new(mut buzzer: B, delay: D) -> Self {
        buzzer.silence();
        Self { buzzer, delay }
    }

    /// Sound one tone for [`TONE_DURATION_MS`], then stay silent for
    /// [`TONE_GAP_MS`].
    pub async fn play_tone(&mut self, tone: Tone) {
        self.buzzer.sound(tone);
        self.delay.delay_ms(TONE_DURATION_MS).await;
        self.buzzer.silence();
        self.delay.delay_ms(TONE_GAP_MS).await;
    }

    /// Play every tone in order. Takes `len * (tone + gap)` and cannot be
    /// interrupted.
    pub async fn play_sequence(&mut self, tones: &[Tone]) {
        for tone in tones {
            self.play_tone(*tone).await;
        }
    }
}

/// RP2040-style PWM slice settings for a square wave at some frequency.
///
/// `f = sys_clk / (divider * (top + 1))` with an integer divider in
/// `1..=255` and a 16-bit `top`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmSettings {
    pub divider: u8,
    pub top: u16,
    pub compare: u16,
}

impl PwmSettings {
    /// Pick the smallest divider that lets `top` fit 16 bits, then derive
    /// `compare` from [`BUZZER_DUTY_PERCENT`].
    ///
    /// Returns `None` for frequencies the slice cannot produce.
    pub fn for_frequency(sys_clk_hz: u32, freq_hz: u32) -> Option<Self> {
        if freq_hz == 0 {
            return None;
        }
        let cycles = sys_clk_hz / freq_hz;
        let divider = cycles.div_ceil(1 << 16).max(1);
        if divider > u32::from(u8::MAX) {
            return None;
        }
        let period = cycles / divider;
        if period < 2 {
            return None;
        }
        let top = (period - 1) as u16;
        let compare = (period * u32::from(BUZZER_DUTY_PERCENT) / 100) as u16;
        Some(Self {
            divider: divider as u8,
            top,
            compare,
        })
    }

    /// Frequency these settings actually produce.
    pub fn frequency(&self, sys_clk_hz: u32) -> u32 {
        sys_clk_hz / (u32::from(self.divider) * (u32::from(self.top) + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SYS_CLOCK_HZ;
    use crate::test_support::{CountingDelay, RecordingBuzzer};
    use embassy_futures::block_on;
    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn sequence_len_grows_every_ten_points() {
        assert_eq!(sequence_len(0), 3);
        assert_eq!(sequence_len(9), 3);
        assert_eq!(sequence_len(10), 4);
        assert_eq!(sequence_len(27), 5);
        assert_eq!(sequence_len(100), 13);
    }

    #[test]
    fn generate_uses_palette_only() {
        let mut rng = SmallRng::seed_from_u64(42);
        let seq = Sequence::generate(50, &mut rng);
        assert_eq!(seq.len(), 8);
        assert!(seq.tones().iter().all(|t| t.palette_index().is_some()));
    }

    #[test]
    fn generate_is_deterministic_for_a_seed() {
        let a = Sequence::generate(30, &mut SmallRng::seed_from_u64(7));
        let b = Sequence::generate(30, &mut SmallRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn matches_requires_every_element() {
        let seq = Sequence::from_tones(alloc::vec![PALETTE[0], PALETTE[3], PALETTE[6]]);
        assert!(seq.matches(&[PALETTE[0], PALETTE[3], PALETTE[6]]));
        assert!(!seq.matches(&[PALETTE[0], PALETTE[3], PALETTE[5]]));
        assert!(!seq.matches(&[PALETTE[0], PALETTE[3]]));
    }

    #[test]
    fn remote_values_map_through_palette() {
        assert_eq!(Tone::from_remote(5), Some(PALETTE[0]));
        assert_eq!(Tone::from_remote(11), Some(PALETTE[6]));
        assert_eq!(Tone::from_remote(440), Some(Tone::from_hz(440)));
        assert_eq!(Tone::from_remote(4), None);
        assert_eq!(Tone::from_remote(12), None);
        assert_eq!(Tone::from_remote(441), None);
    }

    #[test]
    fn play_sequence_blocks_for_tone_and_gap_per_element() {
        let delay = CountingDelay::default();
        let buzzer = RecordingBuzzer::default();
        let mut board = ToneBoard::new(buzzer.clone(), delay.clone());

        let tones = [PALETTE[1], PALETTE[4], PALETTE[2], PALETTE[1]];
        block_on(board.play_sequence(&tones));

        assert_eq!(buzzer.played(), tones.to_vec());
        assert_eq!(delay.total_ms(), 4 * u64::from(TONE_DURATION_MS + TONE_GAP_MS));
        assert!(!buzzer.is_sounding());
    }

    #[test]
    fn pwm_settings_hit_palette_frequencies() {
        for tone in PALETTE {
            let pwm = PwmSettings::for_frequency(SYS_CLOCK_HZ, u32::from(tone.hz())).unwrap();
            let actual = pwm.frequency(SYS_CLOCK_HZ);
            assert!(actual.abs_diff(u32::from(tone.hz())) <= 1, "{} -> {}", tone, actual);
            assert!(pwm.compare < pwm.top);
        }
    }

    #[test]
    fn pwm_settings_reject_unreachable_frequencies() {
        assert_eq!(PwmSettings::for_frequency(SYS_CLOCK_HZ, 0), None);
        assert_eq!(PwmSettings::for_frequency(SYS_CLOCK_HZ, 1), None);
        assert_eq!(PwmSettings::for_frequency(SYS_CLOCK_HZ, SYS_CLOCK_HZ), None);
    }

    proptest! {
        #[test]
        fn generated_length_follows_score(score in 0u32..10_000, seed in any::<u64>()) {
            let seq = Sequence::generate(score, &mut SmallRng::seed_from_u64(seed));
            prop_assert_eq!(seq.len(), 3 + (score / 10) as usize);
            prop_assert!(seq.tones().iter().all(|t| PALETTE.contains(t)));
        }
    }
}
