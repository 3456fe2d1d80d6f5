//! Progression files to MIDI files

use anyhow::{Context, Result};
use chordsmith_core::{generate, MidiGenerationOptions, MidiGenerationResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Join the lines of a progression file into one progression.
///
/// Blank lines and lines starting with `//` are ignored, so a file can lay
/// out one phrase per line and carry notes for the player.
pub fn progression_from_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn read_progression(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(progression_from_text(&text))
}

/// Where a converted file goes when no output path is given
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("mid")
}

/// Generate `options` with the progression read from `input` and write the
/// result to `output` (or next to the input)
pub fn convert_file(
    input: &Path,
    output: Option<&Path>,
    options: &MidiGenerationOptions,
) -> Result<(PathBuf, MidiGenerationResult)> {
    let mut options = options.clone();
    options.progression = read_progression(input)?;

    let result = generate(&options)
        .with_context(|| format!("failed to generate {}", input.display()))?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));
    fs::write(&output, &result.midi_bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        input = %input.display(),
        output = %output.display(),
        bytes = result.midi_bytes.len(),
        "converted progression file"
    );
    Ok((output, result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progression_from_text() {
        let text = "// verse\nC Am\n\n  F G  \n// chorus\nC:2\n";
        assert_eq!(progression_from_text(text), "C Am F G C:2");
        assert_eq!(progression_from_text("// only a comment"), "");
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("songs/verse.txt")),
            PathBuf::from("songs/verse.mid")
        );
        assert_eq!(
            default_output_path(Path::new("verse")),
            PathBuf::from("verse.mid")
        );
    }

    #[test]
    fn test_convert_file() {
        let dir = std::env::temp_dir().join(format!("chordsmith-convert-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("turnaround.txt");
        fs::write(&input, "Dm7 G7\nCmaj7:2\n").unwrap();

        let (output, result) =
            convert_file(&input, None, &MidiGenerationOptions::default()).unwrap();
        assert_eq!(output, dir.join("turnaround.mid"));
        assert_eq!(result.chord_details.len(), 3);
        assert_eq!(fs::read(&output).unwrap(), result.midi_bytes);

        let missing = convert_file(&dir.join("missing.txt"), None, &MidiGenerationOptions::default());
        assert!(missing.is_err());

        fs::remove_dir_all(&dir).unwrap();
    }
}
