//! Media objects and media type classification

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
	Audio,
	Image,
	Video,
	Text,
}

impl MediaType {
	/// Fixed precedence order used by every classification step
	pub const ALL: [MediaType; 4] = [MediaType::Audio, MediaType::Image, MediaType::Video, MediaType::Text];

	pub fn as_str(&self) -> &'static str {
		match self {
			MediaType::Audio => "audio",
			MediaType::Image => "image",
			MediaType::Video => "video",
			MediaType::Text => "text",
		}
	}

	/// Case-insensitive parse of a declared type tag
	pub fn parse(value: &str) -> Option<Self> {
		let value = value.trim();
		Self::ALL.into_iter().find(|t| t.as_str().eq_ignore_ascii_case(value))
	}

	/// Render color hint as hex
	pub fn color(&self) -> &'static str {
		match self {
			MediaType::Audio => "#FF4136",
			MediaType::Image => "#7FDBFF",
			MediaType::Video => "#01FF70",
			MediaType::Text => "#FFDC00",
		}
	}

	/// Render color hint as RGB
	pub fn rgb(&self) -> (u8, u8, u8) {
		match self {
			MediaType::Audio => (0xFF, 0x41, 0x36),
			MediaType::Image => (0x7F, 0xDB, 0xFF),
			MediaType::Video => (0x01, 0xFF, 0x70),
			MediaType::Text => (0xFF, 0xDC, 0x00),
		}
	}

	/// Classify an object, first match wins:
	/// declared type, metadata field, raw content field, title, then text.
	pub fn classify(object: &MediaObject) -> Self {
		if let Some(declared) = object.declared_type.as_deref().and_then(Self::parse) {
			return declared;
		}

		let props = &object.properties;

		if let Some(t) = Self::ALL.into_iter().find(|t| props.metadata(*t).is_some()) {
			return t;
		}

		if let Some(t) = Self::ALL.into_iter().find(|t| props.content(*t).is_some()) {
			return t;
		}

		let title = object.title.to_lowercase();
		[MediaType::Image, MediaType::Audio, MediaType::Video]
			.into_iter()
			.find(|t| title.contains(t.as_str()))
			.unwrap_or(MediaType::Text)
	}
}

impl fmt::Display for MediaType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Extracted media metadata (size, duration, dimensions)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub size: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub duration: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub format: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub width: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub height: Option<u32>,
}

/// Closed set of optional properties consulted during classification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaProperties {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub audio_metadata: Option<MediaMetadata>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_metadata: Option<MediaMetadata>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub video_metadata: Option<MediaMetadata>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub text_metadata: Option<MediaMetadata>,
	/// Raw content (blob reference or inline text)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub audio: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub video: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub text: Option<String>,
}

impl MediaProperties {
	pub fn metadata(&self, media_type: MediaType) -> Option<&MediaMetadata> {
		match media_type {
			MediaType::Audio => self.audio_metadata.as_ref(),
			MediaType::Image => self.image_metadata.as_ref(),
			MediaType::Video => self.video_metadata.as_ref(),
			MediaType::Text => self.text_metadata.as_ref(),
		}
	}

	pub fn content(&self, media_type: MediaType) -> Option<&str> {
		match media_type {
			MediaType::Audio => self.audio.as_deref(),
			MediaType::Image => self.image.as_deref(),
			MediaType::Video => self.video.as_deref(),
			MediaType::Text => self.text.as_deref(),
		}
	}
}

/// A media object as listed by an object source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaObject {
	pub id: String,
	#[serde(default)]
	pub title: String,
	#[serde(default, rename = "mediaType", skip_serializing_if = "Option::is_none")]
	pub declared_type: Option<String>,
	#[serde(default)]
	pub properties: MediaProperties,
}

impl MediaObject {
	pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			title: title.into(),
			..Default::default()
		}
	}

	pub fn with_declared_type(mut self, declared: impl Into<String>) -> Self {
		self.declared_type = Some(declared.into());
		self
	}

	pub fn with_properties(mut self, properties: MediaProperties) -> Self {
		self.properties = properties;
		self
	}

	pub fn media_type(&self) -> MediaType {
		MediaType::classify(self)
	}
}
