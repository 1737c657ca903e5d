// Copyright 2025 the CubeViz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Defensive readers for possibly missing scale, bounds and domain inputs.
//!
//! Nothing past this module ever sees a missing or non-finite number: absent inputs degrade
//! to documented defaults, field by field. These functions never fail.

extern crate alloc;

use alloc::vec::Vec;

use crate::layout::{Bounds, Margins};
use crate::scale::ScaleLinear;

/// Something that may report a two-element numeric domain.
///
/// `domain` returning `None` models a scale whose domain is unavailable.
pub trait DomainProvider {
    /// Returns the raw domain, of any length.
    fn domain(&self) -> Option<Vec<f64>>;
}

impl DomainProvider for ScaleLinear {
    fn domain(&self) -> Option<Vec<f64>> {
        Some(alloc::vec![self.domain_min(), self.domain_max()])
    }
}

impl DomainProvider for [f64] {
    fn domain(&self) -> Option<Vec<f64>> {
        Some(self.to_vec())
    }
}

impl DomainProvider for Vec<f64> {
    fn domain(&self) -> Option<Vec<f64>> {
        Some(self.clone())
    }
}

impl DomainProvider for [f64; 2] {
    fn domain(&self) -> Option<Vec<f64>> {
        Some(self.to_vec())
    }
}

impl DomainProvider for (f64, f64) {
    fn domain(&self) -> Option<Vec<f64>> {
        Some(alloc::vec![self.0, self.1])
    }
}

impl<T: DomainProvider + ?Sized> DomainProvider for Option<&T> {
    fn domain(&self) -> Option<Vec<f64>> {
        self.and_then(DomainProvider::domain)
    }
}

/// Reads a guaranteed-finite `(min, max)` domain.
///
/// Rules, in order:
/// - no scale, or a scale without a domain: `fallback`
/// - a domain that is not exactly two elements: `fallback`
/// - exactly one non-finite element: that slot is replaced by the matching `fallback` slot
/// - both elements non-finite: `fallback`
pub fn safe_domain(scale: Option<&dyn DomainProvider>, fallback: (f64, f64)) -> (f64, f64) {
    let Some(domain) = scale.and_then(DomainProvider::domain) else {
        log::debug!("safe_domain: no domain available, using fallback {fallback:?}");
        return fallback;
    };
    let [d0, d1] = domain[..] else {
        log::debug!(
            "safe_domain: domain has {} elements, using fallback {fallback:?}",
            domain.len()
        );
        return fallback;
    };
    match (d0.is_finite(), d1.is_finite()) {
        (true, true) => (d0, d1),
        (true, false) => (d0, fallback.1),
        (false, true) => (fallback.0, d1),
        (false, false) => {
            log::debug!("safe_domain: non-finite domain, using fallback {fallback:?}");
            fallback
        }
    }
}

/// Returns `value` when it is present and finite, else `fallback`.
pub fn safe_number(value: Option<f64>, fallback: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(fallback)
}

/// Margins as received from upstream; any side may be missing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PartialMargins {
    /// Left margin.
    pub left: Option<f64>,
    /// Right margin.
    pub right: Option<f64>,
    /// Top margin.
    pub top: Option<f64>,
    /// Bottom margin.
    pub bottom: Option<f64>,
}

/// Bounds as received from upstream; any field may be missing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PartialBounds {
    /// Container width.
    pub width: Option<f64>,
    /// Chart height.
    pub chart_height: Option<f64>,
    /// Outer margins.
    pub margins: Option<PartialMargins>,
}

impl PartialBounds {
    /// Bounds with only a width, the common case for a responsive container.
    pub fn with_width(width: f64) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }
}

impl From<Bounds> for PartialBounds {
    fn from(b: Bounds) -> Self {
        Self {
            width: Some(b.width),
            chart_height: Some(b.chart_height),
            margins: Some(PartialMargins {
                left: Some(b.margins.left),
                right: Some(b.margins.right),
                top: Some(b.margins.top),
                bottom: Some(b.margins.bottom),
            }),
        }
    }
}

/// Resolves margins over `defaults`, side by side.
pub fn safe_margins(margins: Option<&PartialMargins>, defaults: Margins) -> Margins {
    let Some(m) = margins else {
        return defaults;
    };
    Margins {
        left: safe_number(m.left, defaults.left),
        right: safe_number(m.right, defaults.right),
        top: safe_number(m.top, defaults.top),
        bottom: safe_number(m.bottom, defaults.bottom),
    }
}

/// Resolves bounds field by field over [`Bounds::default`]
/// (`500 x 300`, margins `left 60, right 40, top 40, bottom 60`).
///
/// Non-finite numbers count as missing.
pub fn safe_bounds(bounds: Option<&PartialBounds>) -> Bounds {
    let defaults = Bounds::default();
    let Some(b) = bounds else {
        log::debug!("safe_bounds: no bounds, using defaults");
        return defaults;
    };
    Bounds {
        width: safe_number(b.width, defaults.width),
        chart_height: safe_number(b.chart_height, defaults.chart_height),
        margins: safe_margins(b.margins.as_ref(), defaults.margins),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoDomain;

    impl DomainProvider for NoDomain {
        fn domain(&self) -> Option<Vec<f64>> {
            None
        }
    }

    #[test]
    fn missing_scale_or_domain_uses_fallback() {
        assert_eq!(safe_domain(None, (0.0, 1.0)), (0.0, 1.0));
        assert_eq!(safe_domain(Some(&NoDomain), (0.0, 1.0)), (0.0, 1.0));
    }

    #[test]
    fn wrong_length_uses_fallback() {
        let short = alloc::vec![3.0];
        let long = alloc::vec![1.0, 2.0, 3.0];
        assert_eq!(safe_domain(Some(&short), (0.0, 1.0)), (0.0, 1.0));
        assert_eq!(safe_domain(Some(&long), (0.0, 1.0)), (0.0, 1.0));
    }

    #[test]
    fn single_non_finite_slot_is_patched() {
        assert_eq!(safe_domain(Some(&[2.0, f64::NAN]), (0.0, 10.0)), (2.0, 10.0));
        assert_eq!(
            safe_domain(Some(&(f64::NEG_INFINITY, 8.0)), (0.0, 10.0)),
            (0.0, 8.0)
        );
        assert_eq!(
            safe_domain(Some(&[f64::NAN, f64::INFINITY]), (0.0, 10.0)),
            (0.0, 10.0)
        );
    }

    #[test]
    fn scale_domain_is_read_through() {
        let scale = ScaleLinear::new((5.0, 50.0), (0.0, 100.0));
        assert_eq!(safe_domain(Some(&scale), (0.0, 1.0)), (5.0, 50.0));
    }

    #[test]
    fn undefined_bounds_resolve_to_defaults() {
        let b = safe_bounds(None);
        assert_eq!(b.width, 500.0);
        assert_eq!(b.chart_height, 300.0);
        assert_eq!(b.margins, Margins::new(60.0, 40.0, 40.0, 60.0));
    }

    #[test]
    fn partial_bounds_default_field_by_field() {
        let partial = PartialBounds {
            width: Some(800.0),
            chart_height: Some(f64::NAN),
            margins: Some(PartialMargins {
                left: Some(10.0),
                ..PartialMargins::default()
            }),
        };
        let b = safe_bounds(Some(&partial));
        assert_eq!(b.width, 800.0);
        assert_eq!(b.chart_height, 300.0);
        assert_eq!(b.margins, Margins::new(10.0, 40.0, 40.0, 60.0));
    }
}
