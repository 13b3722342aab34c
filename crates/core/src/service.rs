// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Service visit types shared by the outbox and the remote client.
//!
//! A service visit is created with a [`ServiceCreateRequest`] and may carry
//! binary evidence captured on site: photos, a customer signature, and
//! PDF/XLSX exports. Attachments captured before the record exists
//! server-side travel together in a [`PendingAttachments`] bundle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Default service type used when none is given.
pub const DEFAULT_SERVICE_TYPE: &str = "Mantención";

/// Body of the "create service record" call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCreateRequest {
    /// Client-generated unique identifier; lets the server deduplicate creations.
    pub service_uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_address: Option<String>,
    /// Kind of visit (maintenance, installation, ...).
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Visit date (ISO 8601); the server defaults to "now" when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl ServiceCreateRequest {
    /// Creates a request with the given uid and the default service type.
    pub fn new(service_uid: impl Into<String>) -> Self {
        ServiceCreateRequest {
            service_uid: service_uid.into(),
            tech_id: None,
            client_id: None,
            client_name: None,
            client_email: None,
            client_phone: None,
            site_id: None,
            site_name: None,
            site_address: None,
            service_type: DEFAULT_SERVICE_TYPE.to_string(),
            notes: None,
            date: None,
        }
    }
}

/// Category of an uploaded file, as understood by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileCategory {
    /// Site photo.
    Photo,
    /// Customer signature image.
    Signature,
    /// PDF export.
    Pdf,
    /// Spreadsheet export.
    Xlsx,
}

impl FileCategory {
    /// Returns the wire name (`PHOTO`, `SIGNATURE`, `PDF`, `XLSX`).
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Photo => "PHOTO",
            FileCategory::Signature => "SIGNATURE",
            FileCategory::Pdf => "PDF",
            FileCategory::Xlsx => "XLSX",
        }
    }

    /// MIME type sent with the multipart upload.
    pub fn mime_type(&self, file_name: &str) -> &'static str {
        match self {
            FileCategory::Pdf => "application/pdf",
            FileCategory::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            FileCategory::Photo | FileCategory::Signature => match extension(file_name).as_deref() {
                Some("png") => "image/png",
                Some("webp") => "image/webp",
                Some("gif") => "image/gif",
                Some("heic") => "image/heic",
                _ => "image/jpeg",
            },
        }
    }

    /// Infers the category of a document from its file name.
    ///
    /// Signatures are never inferred; they are captured explicitly.
    pub fn infer(file_name: &str) -> Option<Self> {
        match extension(file_name)?.as_str() {
            "pdf" => Some(FileCategory::Pdf),
            "xlsx" | "xls" | "csv" => Some(FileCategory::Xlsx),
            "jpg" | "jpeg" | "png" | "webp" | "gif" | "heic" => Some(FileCategory::Photo),
            _ => None,
        }
    }
}

fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name).extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase())
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "photo" => Ok(FileCategory::Photo),
            "signature" => Ok(FileCategory::Signature),
            "pdf" => Ok(FileCategory::Pdf),
            "xlsx" | "excel" => Ok(FileCategory::Xlsx),
            _ => Err(Error::UnknownCategory(s.to_string())),
        }
    }
}

/// A file waiting to be uploaded.
///
/// `content` is not part of the serialized form: the outbox stores it as a
/// separate BLOB so JSON payloads stay small.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    pub category: FileCategory,
    #[serde(skip)]
    pub content: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, category: FileCategory, content: Vec<u8>) -> Self {
        Attachment { file_name: file_name.into(), category, content }
    }

    /// Builds an attachment, inferring the category from the file name.
    pub fn inferred(file_name: impl Into<String>, content: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        let category = FileCategory::infer(&file_name)
            .ok_or_else(|| Error::UninferableCategory(file_name.clone()))?;
        Ok(Attachment { file_name, category, content })
    }

    /// Reads an attachment from disk.
    pub fn read(path: &Path, category: Option<FileCategory>) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| "file".to_string());
        let content = std::fs::read(path)?;
        match category {
            Some(category) => Ok(Attachment::new(file_name, category, content)),
            None => Attachment::inferred(file_name, content),
        }
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("category", &self.category)
            .field("content", &format_args!("<{} bytes>", self.content.len()))
            .finish()
    }
}

/// Files captured before their parent service record exists server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAttachments {
    #[serde(default)]
    pub photos: Vec<Attachment>,
    /// Categorized documents (PDF/XLSX exports, extra images).
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Attachment>,
}

impl PendingAttachments {
    /// Total number of files in the bundle.
    pub fn len(&self) -> usize {
        self.photos.len() + self.attachments.len() + usize::from(self.signature.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates files in upload order: photos, documents, then the signature.
    ///
    /// The position of a file in this order is its slot.
    pub fn iter(&self) -> impl Iterator<Item = &Attachment> {
        self.photos.iter().chain(self.attachments.iter()).chain(self.signature.iter())
    }

    /// Mutable counterpart of [`PendingAttachments::iter`], same order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Attachment> {
        self.photos.iter_mut().chain(self.attachments.iter_mut()).chain(self.signature.iter_mut())
    }
}

/// Body of the "sign and send report" call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDispatch {
    pub client_emails: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
