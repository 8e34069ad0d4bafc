/// Container format of an uploaded recording, sniffed from its leading bytes.
///
/// The remote transcription services pick a decoder from the uploaded file
/// name, so the multipart part must carry a matching extension. Browsers
/// typically record WebM/Opus, not WAV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Ogg,
    Flac,
    Mp4,
    WebM,
}

impl AudioFormat {
    pub fn sniff(data: &[u8]) -> Self {
        match data {
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E', ..] => Self::Wav,
            [b'I', b'D', b'3', ..] | [0xFF, 0xFB | 0xF3 | 0xF2, ..] => Self::Mp3,
            [b'O', b'g', b'g', b'S', ..] => Self::Ogg,
            [b'f', b'L', b'a', b'C', ..] => Self::Flac,
            [_, _, _, _, b'f', b't', b'y', b'p', ..] => Self::Mp4,
            [0x1A, 0x45, 0xDF, 0xA3, ..] => Self::WebM,
            _ => Self::Wav,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Wav => "audio.wav",
            Self::Mp3 => "audio.mp3",
            Self::Ogg => "audio.ogg",
            Self::Flac => "audio.flac",
            Self::Mp4 => "audio.m4a",
            Self::WebM => "audio.webm",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
            Self::Ogg => "audio/ogg",
            Self::Flac => "audio/flac",
            Self::Mp4 => "audio/mp4",
            Self::WebM => "audio/webm",
        }
    }
}
