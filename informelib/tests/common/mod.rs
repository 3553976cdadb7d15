#![allow(dead_code)]

use informelib::model::{ClientRef, PenaltyRecord, RentalRecord, VehicleRef};
use rust_decimal::Decimal;

pub fn rental(id: i64, dni: Option<&str>, plate: Option<&str>, start: &str, price: i64, penalties: &[i64]) -> RentalRecord {
    RentalRecord {
        id,
        client: dni.map(|d| ClientRef {
            dni: d.into(),
            name: Some(format!("Nombre{d}")),
            surname: Some(format!("Apellido{d}")),
        }),
        vehicle: plate.map(|p| VehicleRef {
            plate: p.into(),
            make: Some("Fiat".into()),
            model: Some("Cronos".into()),
            year: Some(2022),
        }),
        start_date: start.into(),
        end_date: start.into(),
        base_price: Decimal::from(price),
        penalties: penalties
            .iter()
            .enumerate()
            .map(|(i, a)| PenaltyRecord {
                id: i as i64 + 1,
                description: "Sanción".into(),
                amount: Decimal::from(*a),
                category: Some("DEV".into()),
            })
            .collect(),
    }
}
