//! Resolution of stale or ambiguous vendor product / design identifiers.
//!
//! Client-submitted ids drift across catalog migrations: a caller may hold a
//! base-product id where a vendor-product id is expected, or a design id from
//! a retired numbering scheme. Resolution runs an ordered list of pure tier
//! functions; the first tier that produces an id wins and later tiers are
//! never consulted. A miss is `None`, never an error -- whether that is fatal
//! is the caller's decision.

use serde::Deserialize;

use crate::types::DbId;

/* --------------------------------------------------------------------------
Reference records
-------------------------------------------------------------------------- */

/// Caller-supplied product reference, possibly stale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductRef {
    pub id: Option<DbId>,
    pub base_product_id: Option<DbId>,
}

/// Caller-supplied design reference, possibly stale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DesignRef {
    pub id: Option<DbId>,
    pub image_url: Option<String>,
}

/// A known vendor product, as handed over by the external catalog store.
#[derive(Debug, Clone, Deserialize)]
pub struct VendorProductRef {
    pub id: DbId,
    pub base_product_id: Option<DbId>,
}

/// A known vendor design, as handed over by the external design store.
#[derive(Debug, Clone, Deserialize)]
pub struct VendorDesignRef {
    pub id: DbId,
    pub image_url: Option<String>,
}

/* --------------------------------------------------------------------------
First-match-wins combinator
-------------------------------------------------------------------------- */

/// Evaluate tiers in order; the first `Some` wins.
fn first_match(tiers: &[&dyn Fn() -> Option<DbId>]) -> Option<DbId> {
    tiers.iter().find_map(|tier| tier())
}

/* --------------------------------------------------------------------------
Vendor product tiers
-------------------------------------------------------------------------- */

/// Tier 1: the submitted id is already a canonical vendor-product id.
fn product_id_is_canonical(product: &ProductRef, known: &[VendorProductRef]) -> Option<DbId> {
    let id = product.id?;
    known.iter().find(|vp| vp.id == id).map(|vp| vp.id)
}

/// Tier 2: the submitted id is actually a catalog base-product id.
fn product_id_matches_base(product: &ProductRef, known: &[VendorProductRef]) -> Option<DbId> {
    let id = product.id?;
    known
        .iter()
        .find(|vp| vp.base_product_id == Some(id))
        .map(|vp| vp.id)
}

/// Tier 3: the reference carries an explicit base-product id.
fn base_product_id_matches(product: &ProductRef, known: &[VendorProductRef]) -> Option<DbId> {
    let base = product.base_product_id?;
    known
        .iter()
        .find(|vp| vp.base_product_id == Some(base))
        .map(|vp| vp.id)
}

/// Resolve a possibly-stale product reference to a canonical vendor-product id.
pub fn resolve_vendor_product_id(
    product: &ProductRef,
    vendor_products: &[VendorProductRef],
) -> Option<DbId> {
    first_match(&[
        &|| product_id_is_canonical(product, vendor_products),
        &|| product_id_matches_base(product, vendor_products),
        &|| base_product_id_matches(product, vendor_products),
    ])
}

/* --------------------------------------------------------------------------
Vendor design tiers
-------------------------------------------------------------------------- */

/// Tier 1: the submitted id is a known vendor-design id.
fn design_id_is_known(design: &DesignRef, known: &[VendorDesignRef]) -> Option<DbId> {
    let id = design.id?;
    known.iter().find(|vd| vd.id == id).map(|vd| vd.id)
}

/// Tier 2: the design's image URL matches a known design.
///
/// Covers identifier churn across a migration where the uploaded asset URLs
/// stayed stable while ids were renumbered.
fn design_url_matches(design: &DesignRef, known: &[VendorDesignRef]) -> Option<DbId> {
    let url = design.image_url.as_deref()?;
    known
        .iter()
        .find(|vd| vd.image_url.as_deref() == Some(url))
        .map(|vd| vd.id)
}

/// Tier 3: the vendor has exactly one design, so it is the only candidate.
fn singleton_design(known: &[VendorDesignRef]) -> Option<DbId> {
    match known {
        [only] => Some(only.id),
        _ => None,
    }
}

/// Resolve a possibly-stale design reference to a canonical vendor-design id.
pub fn resolve_vendor_design_id(
    design: &DesignRef,
    vendor_designs: &[VendorDesignRef],
) -> Option<DbId> {
    first_match(&[
        &|| design_id_is_known(design, vendor_designs),
        &|| design_url_matches(design, vendor_designs),
        &|| singleton_design(vendor_designs),
    ])
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
