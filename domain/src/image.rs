use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

const MAX_SANITIZED_FILENAME_LEN: usize = 100;
const FALLBACK_FILENAME: &str = "upload";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Original,
    Processed,
}

impl ImageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Processed => "processed",
        }
    }
}

impl FromStr for ImageKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" => Ok(Self::Original),
            "processed" => Ok(Self::Processed),
            other => Err(DomainError::InvalidLocator(format!(
                "unknown image kind '{other}'"
            ))),
        }
    }
}

/// Image encodings accepted for upload and produced by enhancement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    pub fn from_extension(ext: &str) -> DomainResult<Self> {
        match ext {
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::Webp),
            other => Err(DomainError::UnsupportedImageFormat(other.to_string())),
        }
    }
}

/// Server-generated handle for stored image bytes.
///
/// Rendered as `<uuid simple>-<kind>.<ext>`. The id is random, so locators
/// cannot be derived from one another, and [`ImageLocator::parse`] accepts only
/// that exact shape, which keeps path separators and dot segments out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageLocator {
    id: Uuid,
    kind: ImageKind,
    format: ImageFormat,
}

impl ImageLocator {
    pub fn generate(kind: ImageKind, format: ImageFormat) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            format,
        }
    }

    pub fn parse(raw: &str) -> DomainResult<Self> {
        let invalid = || DomainError::InvalidLocator(raw.chars().take(64).collect());

        let (id_part, rest) = raw.split_once('-').ok_or_else(invalid)?;
        if id_part.len() != 32
            || !id_part
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            return Err(invalid());
        }
        let id = Uuid::try_parse(id_part).map_err(|_| invalid())?;

        let (kind_part, ext_part) = rest.split_once('.').ok_or_else(invalid)?;
        let kind = kind_part.parse::<ImageKind>().map_err(|_| invalid())?;
        let format = ImageFormat::from_extension(ext_part).map_err(|_| invalid())?;

        if format.extension() != ext_part {
            return Err(invalid());
        }

        Ok(Self { id, kind, format })
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }
}

impl Display for ImageLocator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}-{}.{}",
            self.id.simple(),
            self.kind.as_str(),
            self.format.extension()
        )
    }
}

/// Reduce a client-supplied filename to a short, path-free label.
///
/// The result is informational only and is never used to build storage paths.
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed: String = cleaned
        .trim_start_matches('.')
        .chars()
        .take(MAX_SANITIZED_FILENAME_LEN)
        .collect();

    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed
    }
}
