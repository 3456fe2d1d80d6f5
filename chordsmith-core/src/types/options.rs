//! Generation options
//!
//! Pure configuration data. `MidiGenerationOptions::default()` is a usable
//! configuration apart from the progression text itself; front ends keep one
//! copy per session and adjust fields in place.

use crate::types::time::TimeSignature;

/// Which notes of each chord are written to the MIDI file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum OutputType {
    #[default]
    ChordsOnly,
    ChordsAndBass,
    BassOnly,
    BassAndFifth,
}

impl OutputType {
    pub const ALL: [OutputType; 4] = [
        OutputType::ChordsOnly,
        OutputType::ChordsAndBass,
        OutputType::BassOnly,
        OutputType::BassAndFifth,
    ];

    /// Parse output type from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<OutputType> {
        match s.to_lowercase().as_str() {
            "chords" | "chordsonly" | "chords-only" => Some(OutputType::ChordsOnly),
            "chords+bass" | "chordsandbass" | "chords-and-bass" => Some(OutputType::ChordsAndBass),
            "bass" | "bassonly" | "bass-only" => Some(OutputType::BassOnly),
            "bass+fifth" | "bassandfifth" | "bass-and-fifth" | "power" => {
                Some(OutputType::BassAndFifth)
            }
            _ => None,
        }
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            OutputType::ChordsOnly => "chords",
            OutputType::ChordsAndBass => "chords+bass",
            OutputType::BassOnly => "bass",
            OutputType::BassAndFifth => "bass+fifth",
        }
    }

    /// Filename-safe slug
    pub fn slug(&self) -> &'static str {
        match self {
            OutputType::ChordsOnly => "chords",
            OutputType::ChordsAndBass => "chords_bass",
            OutputType::BassOnly => "bass",
            OutputType::BassAndFifth => "bass_fifth",
        }
    }
}

/// How pitch classes are turned into absolute pitches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum VoicingStrategy {
    /// Compact ascending stack from the root
    #[default]
    RootPosition,
    /// Root moved up an octave
    FirstInversion,
    /// Root and third moved up an octave
    SecondInversion,
    /// Each tone seeks the nearest note of the previous chord
    Smooth,
    /// Left-hand root, right-hand cluster
    Pianist,
    /// Every second voice raised an octave
    Open,
    /// Successive tones at least an octave apart
    Spread,
    /// Left-hand shell, right-hand upper tones with doubled top
    Cocktail,
}

impl VoicingStrategy {
    pub const ALL: [VoicingStrategy; 8] = [
        VoicingStrategy::RootPosition,
        VoicingStrategy::FirstInversion,
        VoicingStrategy::SecondInversion,
        VoicingStrategy::Smooth,
        VoicingStrategy::Pianist,
        VoicingStrategy::Open,
        VoicingStrategy::Spread,
        VoicingStrategy::Cocktail,
    ];

    /// Parse strategy from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<VoicingStrategy> {
        match s.to_lowercase().as_str() {
            "none" | "root" | "rootposition" | "root-position" => {
                Some(VoicingStrategy::RootPosition)
            }
            "first" | "1st" | "firstinversion" | "first-inversion" => {
                Some(VoicingStrategy::FirstInversion)
            }
            "second" | "2nd" | "secondinversion" | "second-inversion" => {
                Some(VoicingStrategy::SecondInversion)
            }
            "smooth" | "voice-leading" | "voiceleading" => Some(VoicingStrategy::Smooth),
            "pianist" => Some(VoicingStrategy::Pianist),
            "open" => Some(VoicingStrategy::Open),
            "spread" => Some(VoicingStrategy::Spread),
            "cocktail" => Some(VoicingStrategy::Cocktail),
            _ => None,
        }
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            VoicingStrategy::RootPosition => "root",
            VoicingStrategy::FirstInversion => "first",
            VoicingStrategy::SecondInversion => "second",
            VoicingStrategy::Smooth => "smooth",
            VoicingStrategy::Pianist => "pianist",
            VoicingStrategy::Open => "open",
            VoicingStrategy::Spread => "spread",
            VoicingStrategy::Cocktail => "cocktail",
        }
    }
}

/// Everything `generate` needs besides the static vocabulary table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct MidiGenerationOptions {
    pub progression: String,
    /// Output file name; derived from the progression when absent
    pub file_name: Option<String>,
    pub output_type: OutputType,
    pub voicing: VoicingStrategy,
    /// Octave of the chord register; octave `n` starts at MIDI note `n * 12`
    pub base_octave: u8,
    /// Duration for tokens without their own, same grammar as token durations
    pub chord_duration: String,
    /// Beats per minute
    pub tempo: u32,
    /// Note-on velocity, clamped to 1..=127
    pub velocity: u8,
    /// MIDI channel, 0-15
    pub channel: u8,
    /// Semitones applied to every root and slash bass
    pub transpose: i8,
    pub time_signature: TimeSignature,
}

impl MidiGenerationOptions {
    pub const DEFAULT_BASE_OCTAVE: u8 = 4;
    pub const MAX_BASE_OCTAVE: u8 = 9;
    pub const DEFAULT_TEMPO: u32 = 120;
    /// Slowest tempo whose quarter note fits the 24-bit tempo meta event
    pub const MIN_TEMPO: u32 = 4;
    pub const MAX_TEMPO: u32 = 960;
    pub const DEFAULT_VELOCITY: u8 = 100;
    pub const MAX_TRANSPOSE: i8 = 24;

    /// Options for a progression with every other field at its default
    pub fn new(progression: impl Into<String>) -> Self {
        Self {
            progression: progression.into(),
            ..Self::default()
        }
    }

    pub fn with_voicing(mut self, voicing: VoicingStrategy) -> Self {
        self.voicing = voicing;
        self
    }

    pub fn with_output_type(mut self, output_type: OutputType) -> Self {
        self.output_type = output_type;
        self
    }

    pub fn with_base_octave(mut self, base_octave: u8) -> Self {
        self.base_octave = base_octave;
        self
    }

    pub fn with_tempo(mut self, tempo: u32) -> Self {
        self.tempo = tempo;
        self
    }

    pub fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_chord_duration(mut self, duration: impl Into<String>) -> Self {
        self.chord_duration = duration.into();
        self
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn with_transpose(mut self, semitones: i8) -> Self {
        self.transpose = semitones;
        self
    }

    pub fn with_time_signature(mut self, meter: TimeSignature) -> Self {
        self.time_signature = meter;
        self
    }

    /// Check the numeric fields, returning a description of the first
    /// problem found
    pub fn validate(&self) -> Result<(), String> {
        if !(Self::MIN_TEMPO..=Self::MAX_TEMPO).contains(&self.tempo) {
            return Err(format!(
                "tempo must be {}-{} BPM, got {}",
                Self::MIN_TEMPO,
                Self::MAX_TEMPO,
                self.tempo
            ));
        }
        if self.base_octave > Self::MAX_BASE_OCTAVE {
            return Err(format!(
                "base octave must be 0-{}, got {}",
                Self::MAX_BASE_OCTAVE,
                self.base_octave
            ));
        }
        if self.channel > 15 {
            return Err(format!("channel must be 0-15, got {}", self.channel));
        }
        if self.transpose.unsigned_abs() > Self::MAX_TRANSPOSE.unsigned_abs() {
            return Err(format!(
                "transpose must be within ±{} semitones, got {}",
                Self::MAX_TRANSPOSE,
                self.transpose
            ));
        }
        if !self.time_signature.is_valid() {
            return Err(format!(
                "invalid time signature {}/{}",
                self.time_signature.numerator, self.time_signature.denominator
            ));
        }
        Ok(())
    }
}

impl Default for MidiGenerationOptions {
    fn default() -> Self {
        Self {
            progression: String::new(),
            file_name: None,
            output_type: OutputType::default(),
            voicing: VoicingStrategy::default(),
            base_octave: Self::DEFAULT_BASE_OCTAVE,
            chord_duration: "1".to_string(),
            tempo: Self::DEFAULT_TEMPO,
            velocity: Self::DEFAULT_VELOCITY,
            channel: 0,
            transpose: 0,
            time_signature: TimeSignature::COMMON,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_type_parsing() {
        assert_eq!(OutputType::from_str("chords"), Some(OutputType::ChordsOnly));
        assert_eq!(OutputType::from_str("Chords+Bass"), Some(OutputType::ChordsAndBass));
        assert_eq!(OutputType::from_str("bass"), Some(OutputType::BassOnly));
        assert_eq!(OutputType::from_str("power"), Some(OutputType::BassAndFifth));
        assert_eq!(OutputType::from_str("drums"), None);

        for output in OutputType::ALL {
            assert_eq!(OutputType::from_str(output.name()), Some(output));
        }
    }

    #[test]
    fn test_voicing_parsing() {
        assert_eq!(VoicingStrategy::from_str("none"), Some(VoicingStrategy::RootPosition));
        assert_eq!(VoicingStrategy::from_str("SMOOTH"), Some(VoicingStrategy::Smooth));
        assert_eq!(VoicingStrategy::from_str("1st"), Some(VoicingStrategy::FirstInversion));
        assert_eq!(VoicingStrategy::from_str("jazz"), None);

        for voicing in VoicingStrategy::ALL {
            assert_eq!(VoicingStrategy::from_str(voicing.name()), Some(voicing));
        }
    }

    #[test]
    fn test_defaults_validate() {
        let options = MidiGenerationOptions::new("C G");
        assert!(options.validate().is_ok());
        assert_eq!(options.tempo, 120);
        assert_eq!(options.chord_duration, "1");
    }

    #[test]
    fn test_validation_failures() {
        assert!(MidiGenerationOptions::new("C").with_tempo(0).validate().is_err());
        assert!(MidiGenerationOptions::new("C").with_base_octave(12).validate().is_err());
        assert!(MidiGenerationOptions::new("C").with_transpose(-30).validate().is_err());
        assert!(MidiGenerationOptions::new("C")
            .with_time_signature(TimeSignature::new(5, 6))
            .validate()
            .is_err());
    }
}
