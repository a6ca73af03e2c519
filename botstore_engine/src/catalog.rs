//! The fixed catalog of hosting packages.
use botstore_common::Rupiah;
use serde::Serialize;

use crate::db_types::PackageSelection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Package {
    pub id: &'static str,
    pub name: &'static str,
    pub memory_mb: u64,
    pub disk_mb: u64,
    pub cpu_percent: u64,
    pub price: Rupiah,
}

/// Ordered by price, cheapest first. [`tier_for_amount`] relies on the ordering.
pub const PACKAGES: [Package; 4] = [
    Package {
        id: "basic",
        name: "Basic Bot Hosting",
        memory_mb: 1024,
        disk_mb: 5120,
        cpu_percent: 50,
        price: Rupiah::new(500),
    },
    Package {
        id: "standard",
        name: "Standard Bot Hosting",
        memory_mb: 2048,
        disk_mb: 10240,
        cpu_percent: 100,
        price: Rupiah::new(750),
    },
    Package {
        id: "premium",
        name: "Premium Bot Hosting",
        memory_mb: 4096,
        disk_mb: 20480,
        cpu_percent: 150,
        price: Rupiah::new(1000),
    },
    Package {
        id: "enterprise",
        name: "Enterprise Bot Hosting",
        memory_mb: 8192,
        disk_mb: 40960,
        cpu_percent: 200,
        price: Rupiah::new(1500),
    },
];

pub fn packages() -> &'static [Package] {
    &PACKAGES
}

pub fn find_package(id: &str) -> Option<&'static Package> {
    PACKAGES.iter().find(|p| p.id == id)
}

/// The most expensive package that `amount` pays for. Anything below the cheapest price gets the cheapest package.
pub fn tier_for_amount(amount: Rupiah) -> &'static Package {
    PACKAGES.iter().rev().find(|p| p.price <= amount).unwrap_or(&PACKAGES[0])
}

impl Package {
    pub fn selection(&self) -> PackageSelection {
        PackageSelection {
            id: self.id.to_string(),
            name: self.name.to_string(),
            memory_mb: self.memory_mb,
            disk_mb: self.disk_mb,
            cpu_percent: self.cpu_percent,
            price: self.price,
        }
    }

    /// Display label for memory, e.g. "2GB".
    pub fn ram_label(&self) -> String {
        format!("{}GB", self.memory_mb / 1024)
    }

    pub fn disk_label(&self) -> String {
        format!("{}GB", self.disk_mb / 1024)
    }

    pub fn cpu_label(&self) -> String {
        format!("{}%", self.cpu_percent)
    }
}
