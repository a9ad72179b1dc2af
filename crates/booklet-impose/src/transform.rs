//! Per-page geometric transforms
//!
//! A page's effective transform is built from up to three contributors:
//! the default (global) transform, an even/odd domain transform, and an
//! explicit per-page override. Resolution priority, highest first:
//!
//! 1. explicit override for the page
//! 2. domain transform matching the page's 1-based page-number parity
//! 3. the default alone
//!
//! When an override or domain transform applies it is composed with the
//! default: shifts and rotations add, scales multiply, mirrors XOR.

#[cfg(feature = "serde")]
use crate::types::{ImposeError, Result};
use std::collections::BTreeMap;

/// Geometric adjustments for one page.
///
/// Shifts are in millimeters (positive = right / up on paper), scales in
/// percent, rotation in degrees (positive = clockwise on paper).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Transform {
    pub h_shift_mm: f64,
    pub v_shift_mm: f64,
    pub scale_percent: f64,
    pub rotation_deg: f64,
    pub h_mirror: bool,
    pub v_mirror: bool,
    pub h_scale_percent: f64,
    pub v_scale_percent: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        h_shift_mm: 0.0,
        v_shift_mm: 0.0,
        scale_percent: 100.0,
        rotation_deg: 0.0,
        h_mirror: false,
        v_mirror: false,
        h_scale_percent: 100.0,
        v_scale_percent: 100.0,
    };

    /// Check if this transform does nothing
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Compose with another transform.
    ///
    /// Commutative: `a.compose(&b) == b.compose(&a)`.
    pub fn compose(&self, other: &Transform) -> Transform {
        Transform {
            h_shift_mm: self.h_shift_mm + other.h_shift_mm,
            v_shift_mm: self.v_shift_mm + other.v_shift_mm,
            scale_percent: self.scale_percent * other.scale_percent / 100.0,
            rotation_deg: self.rotation_deg + other.rotation_deg,
            h_mirror: self.h_mirror != other.h_mirror,
            v_mirror: self.v_mirror != other.v_mirror,
            h_scale_percent: self.h_scale_percent * other.h_scale_percent / 100.0,
            v_scale_percent: self.v_scale_percent * other.v_scale_percent / 100.0,
        }
    }

    /// Horizontal scale factor from the uniform and horizontal-only percentages
    pub fn h_factor(&self) -> f64 {
        (self.h_scale_percent / 100.0) * (self.scale_percent / 100.0)
    }

    /// Vertical scale factor from the uniform and vertical-only percentages
    pub fn v_factor(&self) -> f64 {
        (self.v_scale_percent / 100.0) * (self.scale_percent / 100.0)
    }
}

/// Page-number parity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    /// Parity of the 1-based page number of a 0-based page index
    pub fn of_page_index(page_index: usize) -> Self {
        if (page_index + 1) % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }
}

/// Where a page-level transform should be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Only the selected page
    ThisPage,
    /// Every even-numbered page
    Even,
    /// Every odd-numbered page
    Odd,
}

/// Holds the default, domain and per-page transforms of one document
///
/// Resolution is a pure function of the current contents; insertion order
/// never matters. The store is cloned into an emission pass so the pass
/// reads a stable snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransformStore {
    total_pages: usize,
    default: Transform,
    even: Option<Transform>,
    odd: Option<Transform>,
    overrides: BTreeMap<usize, Transform>,
}

impl TransformStore {
    pub fn new(total_pages: usize) -> Self {
        Self {
            total_pages,
            ..Default::default()
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Rebind the store to a document with a different page count
    pub fn set_page_count(&mut self, total_pages: usize) {
        self.total_pages = total_pages;
    }

    /// A copy of the store bound to a document with `total_pages` pages
    ///
    /// Emission and preview resolve against this, so a store built for a
    /// different page count still applies its transforms to every page
    /// the document actually has.
    pub fn snapshot(&self, total_pages: usize) -> TransformStore {
        TransformStore {
            total_pages,
            ..self.clone()
        }
    }

    pub fn default_transform(&self) -> &Transform {
        &self.default
    }

    pub fn set_default(&mut self, transform: Transform) {
        self.default = transform;
    }

    pub fn domain(&self, parity: Parity) -> Option<&Transform> {
        match parity {
            Parity::Even => self.even.as_ref(),
            Parity::Odd => self.odd.as_ref(),
        }
    }

    pub fn set_domain(&mut self, parity: Parity, transform: Transform) {
        match parity {
            Parity::Even => self.even = Some(transform),
            Parity::Odd => self.odd = Some(transform),
        }
    }

    pub fn set_override(&mut self, page_index: usize, transform: Transform) {
        self.overrides.insert(page_index, transform);
    }

    pub fn clear_override(&mut self, page_index: usize) {
        self.overrides.remove(&page_index);
    }

    /// Route a page-level transform to an override or a domain slot
    pub fn apply(&mut self, domain: Domain, page_index: usize, transform: Transform) {
        match domain {
            Domain::ThisPage => self.set_override(page_index, transform),
            Domain::Even => self.set_domain(Parity::Even, transform),
            Domain::Odd => self.set_domain(Parity::Odd, transform),
        }
    }

    pub fn clear_domains(&mut self) {
        self.even = None;
        self.odd = None;
    }

    /// Clear overrides and domain transforms, keeping the default
    pub fn clear_all_page_transforms(&mut self) {
        self.overrides.clear();
        self.clear_domains();
    }

    /// Back to identity everywhere
    pub fn reset(&mut self) {
        self.default = Transform::IDENTITY;
        self.clear_all_page_transforms();
    }

    /// The explicit override alone, identity if none is set
    pub fn page_only(&self, page_index: usize) -> Transform {
        self.overrides
            .get(&page_index)
            .copied()
            .unwrap_or(Transform::IDENTITY)
    }

    pub fn has_override(&self, page_index: usize) -> bool {
        self.overrides.contains_key(&page_index)
    }

    /// Check if any non-identity transform is active
    pub fn has_any_transforms(&self) -> bool {
        !self.default.is_identity()
            || self.even.is_some_and(|t| !t.is_identity())
            || self.odd.is_some_and(|t| !t.is_identity())
            || self.overrides.values().any(|t| !t.is_identity())
    }

    /// Effective transform for a 0-based source page index.
    ///
    /// Out-of-range indices resolve to identity.
    pub fn resolve(&self, page_index: usize) -> Transform {
        if page_index >= self.total_pages {
            return Transform::IDENTITY;
        }

        if let Some(page) = self.overrides.get(&page_index) {
            return page.compose(&self.default);
        }

        match self.domain(Parity::of_page_index(page_index)) {
            Some(domain) => domain.compose(&self.default),
            None => self.default,
        }
    }

    /// Load a store from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ImposeError::Config(format!("Failed to parse transforms: {}", e)))
    }

    /// Save the store to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ImposeError::Config(format!("Failed to serialize transforms: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

/// Resolve the effective transform of one page
pub fn resolve_transform(store: &TransformStore, page_index: usize) -> Transform {
    store.resolve(page_index)
}
