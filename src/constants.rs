//! Physical constants shared by the hull, foil and wind models.
//!
//! Every force component takes its fluid properties from a [`Constants`]
//! value rather than from literals, so a whole simulation can be switched
//! between sea water and fresh water (or a custom tank) in one place.

use serde::{Deserialize, Serialize};

/// Fluid and gravity constants for one simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constants {
    /// Gravitational acceleration (m/s²)
    pub g: f64,

    /// Water density (kg/m³)
    /// Sea water at 15°C: 1025.9 kg/m³
    pub rho_water: f64,

    /// Air density (kg/m³)
    /// Standard value: 1.225 kg/m³ at 15°C, 1 atm
    pub rho_air: f64,

    /// Kinematic viscosity of water (m²/s)
    /// Sea water at 15°C: 1.19e-6 m²/s
    pub nu_water: f64,
}

impl Constants {
    /// Sea water at 15°C.
    pub const fn new() -> Self {
        Self { g: 9.81, rho_water: 1025.9, rho_air: 1.225, nu_water: 1.19e-6 }
    }

    /// Same as [`new`](Self::new).
    pub const fn seawater() -> Self {
        Self::new()
    }

    /// Fresh water at 15°C (towing tank conditions).
    pub const fn freshwater() -> Self {
        Self { g: 9.81, rho_water: 999.1, rho_air: 1.225, nu_water: 1.139e-6 }
    }

    /// Custom fluid properties; air keeps its standard density when `None`.
    pub fn custom(g: f64, rho_water: f64, nu_water: f64, rho_air: Option<f64>) -> Self {
        Self { g, rho_water, rho_air: rho_air.unwrap_or(1.225), nu_water }
    }

    /// Hydrostatic weight of one cubic metre of water, ρ·g (N/m³).
    #[inline(always)]
    pub fn specific_weight(&self) -> f64 {
        self.rho_water * self.g
    }

    /// Dynamic pressure ½ρV² for a speed in water.
    #[inline(always)]
    pub fn water_dynamic_pressure(&self, speed: f64) -> f64 {
        0.5 * self.rho_water * speed * speed
    }

    /// Dynamic pressure ½ρV² for a speed in air.
    #[inline(always)]
    pub fn air_dynamic_pressure(&self, speed: f64) -> f64 {
        0.5 * self.rho_air * speed * speed
    }

    /// Summary of constants for reporting.
    pub fn summary(&self) -> std::collections::HashMap<String, String> {
        let mut map = std::collections::HashMap::new();
        map.insert("g (m/s²)".to_string(), format!("{:.4}", self.g));
        map.insert("ρ_water (kg/m³)".to_string(), format!("{:.2}", self.rho_water));
        map.insert("ρ_air (kg/m³)".to_string(), format!("{:.4}", self.rho_air));
        map.insert("ν_water (m²/s)".to_string(), format!("{:.3e}", self.nu_water));
        map
    }
}

impl Default for Constants {
    fn default() -> Self {
        Self::new()
    }
}
