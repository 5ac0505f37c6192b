//! WAV container for rendered notes: mono, 16-bit signed PCM.

use std::{
    fs,
    io,
    path::{Path, PathBuf},
    process,
};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use super::CacheError;

pub const CHANNELS: u16 = 1;
pub const BITS_PER_SAMPLE: u16 = 16;

pub fn pcm_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: CHANNELS,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    }
}

/// Write `pcm` to `path` as a mono 16-bit WAV file.
///
/// The data goes to a sibling temp file first and is renamed into place once
/// the header is finalized, so readers never see a half-written asset.
pub fn write_pcm(path: &Path, pcm: &[i16], sample_rate: u32) -> Result<(), CacheError> {
    let tmp = temp_path(path);

    let written = write_file(&tmp, pcm, sample_rate)
        .and_then(|()| fs::rename(&tmp, path).map_err(CacheError::from));
    if written.is_err() {
        // Best effort; the original error is what matters.
        let _ = fs::remove_file(&tmp);
    }
    written
}

fn write_file(path: &Path, pcm: &[i16], sample_rate: u32) -> Result<(), CacheError> {
    let mut writer = WavWriter::create(path, pcm_spec(sample_rate))?;
    for &sample in pcm {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".tmp-{}", process::id()));
    path.with_file_name(name)
}

/// Read a mono 16-bit WAV file recorded at `sample_rate`.
pub fn read_pcm(path: &Path, sample_rate: u32) -> Result<Vec<i16>, CacheError> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    if spec != pcm_spec(sample_rate) {
        return Err(CacheError::UnexpectedFormat {
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            sample_rate: spec.sample_rate,
        });
    }

    reader
        .samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(CacheError::from)
}

/// Whether `path` names an existing regular file.
pub fn exists(path: &Path) -> io::Result<bool> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::test_dir;

    #[test]
    fn round_trip_is_bit_exact() {
        let dir = test_dir("wav_round_trip");
        let path = dir.join("note.wav");
        let pcm: Vec<i16> = (0..44_100i32)
            .map(|i| ((i * 7919) % 65_536 - 32_768) as i16)
            .collect();

        write_pcm(&path, &pcm, 44_100).unwrap();
        assert_eq!(read_pcm(&path, 44_100).unwrap(), pcm);

        let reader = WavReader::open(&path).unwrap();
        assert_eq!(reader.spec(), pcm_spec(44_100));
        assert_eq!(reader.duration(), 44_100);
    }

    #[test]
    fn leaves_no_temp_file_behind() {
        let dir = test_dir("wav_no_temp");
        let path = dir.join("note.wav");
        write_pcm(&path, &[1, 2, 3], 44_100).unwrap();

        let names: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("note.wav")]);
    }

    #[test]
    fn rejects_other_formats() {
        let dir = test_dir("wav_wrong_rate");
        let path = dir.join("note.wav");
        write_pcm(&path, &[0; 16], 48_000).unwrap();

        assert!(matches!(
            read_pcm(&path, 44_100),
            Err(CacheError::UnexpectedFormat {
                sample_rate: 48_000,
                ..
            })
        ));
    }

    #[test]
    fn failed_write_reports_error() {
        let dir = test_dir("wav_missing_dir");
        let path = dir.join("missing").join("note.wav");
        assert!(write_pcm(&path, &[0; 4], 44_100).is_err());
        assert!(!exists(&path).unwrap());
    }
}
