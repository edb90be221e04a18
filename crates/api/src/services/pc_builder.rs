//! PC-builder compatibility checking.
//!
//! The catalog stores compatibility data as free-form Vietnamese/English
//! specification strings ("Socket" => "LGA 1700", "Công suất" => "750W").
//! This service turns the selected products into [`ComponentProfile`]s and
//! hands them to the pure rule engine in `gearshop_core::pcbuild`.

use gearshop_core::{ProductId, Vnd, messages};
use gearshop_core::pcbuild::{
    BuildReport, ComponentKind, ComponentProfile, FormFactor, MemoryType, evaluate,
};
use serde::{Deserialize, Serialize};

use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::product::Specification;
use crate::state::AppState;

/// `POST /api/pc-builder/check` payload: the selected product per slot.
#[derive(Debug, Deserialize)]
pub struct BuildCheckRequest {
    pub product_ids: Vec<ProductId>,
}

#[derive(Debug, Serialize)]
pub struct BuildCheckResponse {
    #[serde(flatten)]
    pub report: BuildReport,
    /// Sum of the selected products' current prices.
    pub total_price: Vnd,
}

pub struct PcBuilderService<'a> {
    state: &'a AppState,
}

impl<'a> PcBuilderService<'a> {
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Load the selected products, build their profiles, and evaluate.
    pub async fn check(&self, req: &BuildCheckRequest) -> Result<BuildCheckResponse> {
        if req.product_ids.is_empty() {
            return Err(AppError::bad_request(messages::VALIDATION));
        }

        let products = ProductRepository::new(self.state.pool());
        let mut profiles = Vec::with_capacity(req.product_ids.len());
        let mut total_price = Vnd::ZERO;

        for &id in &req.product_ids {
            let product = products
                .find_opt(id)
                .await?
                .ok_or_else(|| AppError::not_found(messages::PRODUCT_NOT_FOUND))?;
            let Some(kind) = product.component_kind else {
                return Err(AppError::bad_request(messages::COMPONENT_KIND_MISSING));
            };

            total_price = total_price
                .checked_add(product.price)
                .ok_or_else(|| AppError::Internal("build total overflow".to_string()))?;

            let specs = products.specifications(id).await?;
            profiles.push(build_profile(kind, &product.name, &specs));
        }

        Ok(BuildCheckResponse {
            report: evaluate(&profiles),
            total_price,
        })
    }
}

/// Extract a [`ComponentProfile`] from a product's specification rows.
///
/// Matching is name-based and tolerant: the catalog is hand-maintained in
/// two languages, so each field probes several label variants and falls
/// back to scanning values where that is safe (memory type, form factor).
fn build_profile(kind: ComponentKind, name: &str, specs: &[Specification]) -> ComponentProfile {
    let mut profile = ComponentProfile::new(kind, name);

    for spec in specs {
        let label = spec.name.to_lowercase();
        let value = spec.value.trim();

        if label.contains("socket") || label.contains("đế cắm") {
            if kind == ComponentKind::Cooler {
                profile.supported_sockets = split_sockets(value);
            } else {
                profile.socket = Some(value.to_string());
            }
        }

        if profile.memory_type.is_none()
            && (label.contains("ram")
                || label.contains("memory")
                || label.contains("bộ nhớ")
                || kind == ComponentKind::Ram)
        {
            profile.memory_type = MemoryType::find_in(value);
        }

        if profile.form_factor.is_none()
            && (label.contains("form factor")
                || label.contains("kích thước")
                || label.contains("chuẩn"))
        {
            profile.form_factor = FormFactor::find_in(value);
        }

        if kind == ComponentKind::Psu
            && (label.contains("công suất") || label.contains("wattage") || label.contains("power"))
        {
            profile.wattage = extract_watts(value);
        }

        if label.contains("tdp") || label.contains("tiêu thụ") || label.contains("power draw") {
            profile.power_draw = extract_watts(value);
        }
    }

    profile
}

/// Split a cooler's socket list: `"LGA1700, LGA1200 / AM4; AM5"`.
fn split_sockets(value: &str) -> Vec<String> {
    value
        .split([',', '/', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// First integer in a spec string: `"750W (80+ Gold)"` → 750.
fn extract_watts(value: &str) -> Option<u32> {
    let digits: String = value
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}
