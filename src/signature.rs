use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A byte pattern that must never appear anywhere in an accepted upload,
/// together with an operator-facing description used in rejection reasons.
///
/// Patterns are stored as strings so a signature file stays hand-editable;
/// scanning always happens over the raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaliciousSignature {
    pattern: String,
    description: String,
}

impl MaliciousSignature {
    pub fn new(pattern: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            description: description.into(),
        }
    }

    pub fn pattern(&self) -> &[u8] {
        self.pattern.as_bytes()
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Where a signature matched in the scanned buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHit<'a> {
    pub offset: usize,
    pub description: &'a str,
}

#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("signature pattern must not be empty")]
    EmptyPattern,
    #[error("signature description must not be empty")]
    EmptyDescription,
    #[error("signature set could not be parsed: {0}")]
    Json(#[from] serde_json::Error),
}

/// The set of byte signatures scanned for in every upload. Compiled once
/// into an Aho-Corasick automaton so a scan is a single pass over the
/// buffer regardless of how many signatures are registered.
#[derive(Debug, Clone)]
pub struct SignatureSet {
    signatures: Vec<MaliciousSignature>,
    matcher: Option<AhoCorasick>,
}

impl SignatureSet {
    pub fn empty() -> Self {
        Self {
            signatures: Vec::new(),
            matcher: None,
        }
    }

    /// The built-in threat set: executable, document, and script markers
    /// that have no business inside an image upload.
    pub fn default_threats() -> Self {
        let mut set = Self::empty();
        for (pattern, description) in [
            ("MZ", "Windows executable header"),
            ("%PDF", "PDF document header"),
            ("<!DOCTYPE html>", "HTML document marker"),
            ("<script", "HTML script tag"),
            ("<?php", "PHP code marker"),
            ("#!/bin", "shell interpreter line"),
        ] {
            set.signatures.push(MaliciousSignature::new(pattern, description));
        }
        set.rebuild_matcher();
        set
    }

    pub fn from_signatures(
        signatures: Vec<MaliciousSignature>,
    ) -> Result<Self, SignatureError> {
        for sig in &signatures {
            if sig.pattern.is_empty() {
                return Err(SignatureError::EmptyPattern);
            }
            if sig.description.is_empty() {
                return Err(SignatureError::EmptyDescription);
            }
        }
        let mut set = Self {
            signatures,
            matcher: None,
        };
        set.rebuild_matcher();
        Ok(set)
    }

    /// Loads a JSON array of `{ "pattern": ..., "description": ... }`
    /// entries, the operator extension point for the threat set.
    pub fn from_json_slice(data: &[u8]) -> Result<Self, SignatureError> {
        let signatures: Vec<MaliciousSignature> = serde_json::from_slice(data)?;
        Self::from_signatures(signatures)
    }

    pub fn to_json_string(&self) -> Result<String, SignatureError> {
        Ok(serde_json::to_string_pretty(&self.signatures)?)
    }

    pub fn push(&mut self, signature: MaliciousSignature) -> Result<(), SignatureError> {
        if signature.pattern.is_empty() {
            return Err(SignatureError::EmptyPattern);
        }
        if signature.description.is_empty() {
            return Err(SignatureError::EmptyDescription);
        }
        self.signatures.push(signature);
        self.rebuild_matcher();
        Ok(())
    }

    pub fn extend(&mut self, other: SignatureSet) {
        self.signatures.extend(other.signatures);
        self.rebuild_matcher();
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaliciousSignature> {
        self.signatures.iter()
    }

    fn rebuild_matcher(&mut self) {
        if self.signatures.is_empty() {
            self.matcher = None;
            return;
        }
        let patterns: Vec<&[u8]> = self.signatures.iter().map(|s| s.pattern()).collect();
        // LeftmostFirst: the earliest offset wins, ties broken by set order.
        self.matcher = match AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .build(&patterns)
        {
            Ok(matcher) => Some(matcher),
            Err(err) => {
                warn!(error = %err, "signature matcher could not be built");
                None
            }
        };
    }

    /// Scans the whole buffer, not just the header. Appended payloads and
    /// polyglot files hide their markers past the image data.
    pub fn scan(&self, data: &[u8]) -> Option<SignatureHit<'_>> {
        let matcher = self.matcher.as_ref()?;
        let mat = matcher.find(data)?;
        let sig = &self.signatures[mat.pattern().as_usize()];
        Some(SignatureHit {
            offset: mat.start(),
            description: sig.description(),
        })
    }
}

impl Default for SignatureSet {
    fn default() -> Self {
        Self::default_threats()
    }
}
