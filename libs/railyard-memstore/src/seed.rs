//! Seed catalog
//!
//! The fixed set of components a fresh store boots with. Ids are assigned
//! 1..=30 in listing order; quantity-tracked components start at zero stock.

use railyard_domain::catalog::{Component, ComponentId};

/// The components a seeded store starts with
pub fn seed_catalog() -> Vec<Component> {
    let rows: [(&str, &str, bool); 30] = [
        ("Engine", "ENG123", false),
        ("Passenger Car", "PAS456", false),
        ("Freight Car", "FRT789", false),
        ("Wheel", "WHL101", true),
        ("Seat", "STS234", true),
        ("Window", "WIN567", true),
        ("Door", "DR123", true),
        ("Control Panel", "CTL987", true),
        ("Light", "LGT456", true),
        ("Brake", "BRK789", true),
        ("Bolt", "BLT321", true),
        ("Nut", "NUT654", true),
        ("Engine Hood", "EH789", false),
        ("Axle", "AX456", false),
        ("Piston", "PST789", false),
        ("Handrail", "HND234", true),
        ("Step", "STP567", true),
        ("Roof", "RF123", false),
        ("Air Conditioner", "AC789", false),
        ("Flooring", "FLR456", false),
        ("Mirror", "MRR789", true),
        ("Horn", "HRN321", false),
        ("Coupler", "CPL654", false),
        ("Hinge", "HNG987", true),
        ("Ladder", "LDR456", true),
        ("Paint", "PNT789", false),
        ("Decal", "DCL321", true),
        ("Gauge", "GGS654", true),
        ("Battery", "BTR987", false),
        ("Radiator", "RDR456", false),
    ];

    rows.iter()
        .enumerate()
        .map(|(index, (name, unique_number, can_assign_quantity))| {
            Component::from_parts(
                ComponentId::new(index as i64 + 1),
                *name,
                *unique_number,
                *can_assign_quantity,
                can_assign_quantity.then_some(0),
            )
        })
        .collect()
}
