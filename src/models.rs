//! Domain models for boat admeasurement records. `BoatRecord` is what gets
//! persisted and exported; `BoatDetails` is the user-editable part of it and is
//! what the form works on. `BoatField` is the single list of editable fields so
//! the form, the certificate, and the spreadsheet never drift apart.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Which block of the form and certificate a field belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Section {
    OwnerDetails,
    BoatMeasurements,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Section::OwnerDetails => "Owner Details",
            Section::BoatMeasurements => "Boat Measurements",
        }
    }
}

/// Every user-editable field, in storage order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BoatField {
    OwnerName,
    OwnerAddress,
    BoatName,
    BoatBuilder,
    YearOfBuild,
    EngineMake,
    EngineSerial,
    HorsePower,
    NumberOfCylinders,
    PlaceOfAdmeasurement,
    RegisterLength,
    RegisterBreadth,
    RegisterDepth,
    TonnageLength,
    TonnageBreadth,
    TonnageDepth,
    GrossTonnage,
    NetTonnage,
}

impl BoatField {
    pub const ALL: [BoatField; 18] = [
        BoatField::OwnerName,
        BoatField::OwnerAddress,
        BoatField::BoatName,
        BoatField::BoatBuilder,
        BoatField::YearOfBuild,
        BoatField::EngineMake,
        BoatField::EngineSerial,
        BoatField::HorsePower,
        BoatField::NumberOfCylinders,
        BoatField::PlaceOfAdmeasurement,
        BoatField::RegisterLength,
        BoatField::RegisterBreadth,
        BoatField::RegisterDepth,
        BoatField::TonnageLength,
        BoatField::TonnageBreadth,
        BoatField::TonnageDepth,
        BoatField::GrossTonnage,
        BoatField::NetTonnage,
    ];

    /// Order the record form walks the fields: boat name sits next to the
    /// owner, ahead of the address.
    pub const FORM_ORDER: [BoatField; 18] = [
        BoatField::OwnerName,
        BoatField::BoatName,
        BoatField::OwnerAddress,
        BoatField::BoatBuilder,
        BoatField::YearOfBuild,
        BoatField::EngineMake,
        BoatField::EngineSerial,
        BoatField::HorsePower,
        BoatField::NumberOfCylinders,
        BoatField::PlaceOfAdmeasurement,
        BoatField::RegisterLength,
        BoatField::RegisterBreadth,
        BoatField::RegisterDepth,
        BoatField::TonnageLength,
        BoatField::TonnageBreadth,
        BoatField::TonnageDepth,
        BoatField::GrossTonnage,
        BoatField::NetTonnage,
    ];

    /// JSON key and spreadsheet column header.
    pub fn key(self) -> &'static str {
        match self {
            BoatField::OwnerName => "ownerName",
            BoatField::OwnerAddress => "ownerAddress",
            BoatField::BoatName => "boatName",
            BoatField::BoatBuilder => "boatBuilder",
            BoatField::YearOfBuild => "yearOfBuild",
            BoatField::EngineMake => "engineMake",
            BoatField::EngineSerial => "engineSerial",
            BoatField::HorsePower => "horsePower",
            BoatField::NumberOfCylinders => "numberOfCylinders",
            BoatField::PlaceOfAdmeasurement => "placeOfAdmeasurement",
            BoatField::RegisterLength => "registerLength",
            BoatField::RegisterBreadth => "registerBreadth",
            BoatField::RegisterDepth => "registerDepth",
            BoatField::TonnageLength => "tonnageLength",
            BoatField::TonnageBreadth => "tonnageBreadth",
            BoatField::TonnageDepth => "tonnageDepth",
            BoatField::GrossTonnage => "grossTonnage",
            BoatField::NetTonnage => "netTonnage",
        }
    }

    /// Label shown next to the input in the record form.
    pub fn label(self) -> &'static str {
        match self {
            BoatField::OwnerName => "Name of Owner",
            BoatField::OwnerAddress => "Address",
            BoatField::BoatName => "Name of Boat",
            BoatField::BoatBuilder => "Boat Builder (Full Name)",
            BoatField::YearOfBuild => "Year of Build",
            BoatField::EngineMake => "Engine Make",
            BoatField::EngineSerial => "Engine Serial No.",
            BoatField::HorsePower => "Horse Power",
            BoatField::NumberOfCylinders => "No. of Cylinder",
            BoatField::PlaceOfAdmeasurement => "Place of Admeasurement",
            BoatField::RegisterLength => "Register Length (RL)",
            BoatField::RegisterBreadth => "Register Breadth (RB)",
            BoatField::RegisterDepth => "Register Depth (RD)",
            BoatField::TonnageLength => "Tonnage Length (TL)",
            BoatField::TonnageBreadth => "Tonnage Breadth (TB)",
            BoatField::TonnageDepth => "Tonnage Depth (TD)",
            BoatField::GrossTonnage => "Gross Tonnage (GT)",
            BoatField::NetTonnage => "Net Tonnage (NT)",
        }
    }

    /// Ghost text rendered while the input is empty.
    pub fn placeholder(self) -> &'static str {
        match self {
            BoatField::OwnerName => "Enter owner name",
            BoatField::OwnerAddress => "Enter complete address",
            BoatField::BoatName => "Enter boat name",
            BoatField::BoatBuilder => "Enter boat builder name",
            BoatField::YearOfBuild => "YYYY",
            BoatField::EngineMake => "Enter engine make",
            BoatField::EngineSerial => "Enter engine serial number",
            BoatField::HorsePower => "Enter horse power",
            BoatField::NumberOfCylinders => "Enter number of cylinders",
            BoatField::PlaceOfAdmeasurement => "Enter place of admeasurement",
            BoatField::RegisterLength => "Enter RL",
            BoatField::RegisterBreadth => "Enter RB",
            BoatField::RegisterDepth => "Enter RD",
            BoatField::TonnageLength => "Enter TL",
            BoatField::TonnageBreadth => "Enter TB",
            BoatField::TonnageDepth => "Enter TD",
            BoatField::GrossTonnage => "Enter GT",
            BoatField::NetTonnage => "Enter NT",
        }
    }

    /// Label printed on the certificate line for this field.
    pub fn certificate_label(self) -> &'static str {
        match self {
            BoatField::OwnerName => "Name",
            BoatField::BoatName => "Boat Name",
            BoatField::BoatBuilder => "Builder",
            BoatField::EngineSerial => "Engine Serial",
            BoatField::NumberOfCylinders => "Cylinders",
            other => other.label(),
        }
    }

    pub fn section(self) -> Section {
        match self {
            BoatField::OwnerName
            | BoatField::OwnerAddress
            | BoatField::BoatName
            | BoatField::BoatBuilder
            | BoatField::YearOfBuild
            | BoatField::EngineMake
            | BoatField::EngineSerial
            | BoatField::HorsePower
            | BoatField::NumberOfCylinders
            | BoatField::PlaceOfAdmeasurement => Section::OwnerDetails,
            _ => Section::BoatMeasurements,
        }
    }

    /// Position inside [`BoatField::ALL`].
    pub fn index(self) -> usize {
        BoatField::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or_default()
    }

    /// Position inside [`BoatField::FORM_ORDER`].
    pub fn form_index(self) -> usize {
        BoatField::FORM_ORDER
            .iter()
            .position(|field| *field == self)
            .unwrap_or_default()
    }
}

/// The user-editable part of a record. Every value is free text; numeric-looking
/// fields are deliberately not parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoatDetails {
    pub owner_name: String,
    pub owner_address: String,
    pub boat_name: String,
    pub boat_builder: String,
    pub year_of_build: String,
    pub engine_make: String,
    pub engine_serial: String,
    pub horse_power: String,
    pub number_of_cylinders: String,
    pub place_of_admeasurement: String,
    pub register_length: String,
    pub register_breadth: String,
    pub register_depth: String,
    pub tonnage_length: String,
    pub tonnage_breadth: String,
    pub tonnage_depth: String,
    pub gross_tonnage: String,
    pub net_tonnage: String,
}

impl BoatDetails {
    /// All fields empty; the starting point of the create form.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Copy the editable fields out of an existing record for the edit form.
    pub fn from_record(record: &BoatRecord) -> Self {
        record.details.clone()
    }

    pub fn get(&self, field: BoatField) -> &str {
        match field {
            BoatField::OwnerName => &self.owner_name,
            BoatField::OwnerAddress => &self.owner_address,
            BoatField::BoatName => &self.boat_name,
            BoatField::BoatBuilder => &self.boat_builder,
            BoatField::YearOfBuild => &self.year_of_build,
            BoatField::EngineMake => &self.engine_make,
            BoatField::EngineSerial => &self.engine_serial,
            BoatField::HorsePower => &self.horse_power,
            BoatField::NumberOfCylinders => &self.number_of_cylinders,
            BoatField::PlaceOfAdmeasurement => &self.place_of_admeasurement,
            BoatField::RegisterLength => &self.register_length,
            BoatField::RegisterBreadth => &self.register_breadth,
            BoatField::RegisterDepth => &self.register_depth,
            BoatField::TonnageLength => &self.tonnage_length,
            BoatField::TonnageBreadth => &self.tonnage_breadth,
            BoatField::TonnageDepth => &self.tonnage_depth,
            BoatField::GrossTonnage => &self.gross_tonnage,
            BoatField::NetTonnage => &self.net_tonnage,
        }
    }

    pub fn get_mut(&mut self, field: BoatField) -> &mut String {
        match field {
            BoatField::OwnerName => &mut self.owner_name,
            BoatField::OwnerAddress => &mut self.owner_address,
            BoatField::BoatName => &mut self.boat_name,
            BoatField::BoatBuilder => &mut self.boat_builder,
            BoatField::YearOfBuild => &mut self.year_of_build,
            BoatField::EngineMake => &mut self.engine_make,
            BoatField::EngineSerial => &mut self.engine_serial,
            BoatField::HorsePower => &mut self.horse_power,
            BoatField::NumberOfCylinders => &mut self.number_of_cylinders,
            BoatField::PlaceOfAdmeasurement => &mut self.place_of_admeasurement,
            BoatField::RegisterLength => &mut self.register_length,
            BoatField::RegisterBreadth => &mut self.register_breadth,
            BoatField::RegisterDepth => &mut self.register_depth,
            BoatField::TonnageLength => &mut self.tonnage_length,
            BoatField::TonnageBreadth => &mut self.tonnage_breadth,
            BoatField::TonnageDepth => &mut self.tonnage_depth,
            BoatField::GrossTonnage => &mut self.gross_tonnage,
            BoatField::NetTonnage => &mut self.net_tonnage,
        }
    }

    pub fn set(&mut self, field: BoatField, value: impl Into<String>) {
        *self.get_mut(field) = value.into();
    }

    /// Fields that would block a submit, empty or whitespace only, in form
    /// order.
    pub fn missing_fields(&self) -> Vec<BoatField> {
        BoatField::FORM_ORDER
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }
}

/// One persisted boat registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoatRecord {
    pub id: String,
    #[serde(flatten)]
    pub details: BoatDetails,
    pub created_at: String,
    pub updated_at: String,
}

impl BoatRecord {
    /// Column headers in the same order `serde_json` writes the keys.
    pub fn columns() -> Vec<&'static str> {
        let mut columns = Vec::with_capacity(BoatField::ALL.len() + 3);
        columns.push("id");
        columns.extend(BoatField::ALL.iter().map(|field| field.key()));
        columns.push("createdAt");
        columns.push("updatedAt");
        columns
    }

    /// Cell values matching [`BoatRecord::columns`].
    pub fn column_values(&self) -> Vec<&str> {
        let mut values = Vec::with_capacity(BoatField::ALL.len() + 3);
        values.push(self.id.as_str());
        values.extend(BoatField::ALL.iter().map(|field| self.details.get(*field)));
        values.push(self.created_at.as_str());
        values.push(self.updated_at.as_str());
        values
    }

    /// The example record written into an empty store.
    pub fn seed() -> Self {
        Self {
            id: "1".to_string(),
            details: BoatDetails {
                owner_name: "John Oliver G. Virola".to_string(),
                owner_address: "Paluan, Occidental Mindoro".to_string(),
                boat_name: "John Oliver".to_string(),
                boat_builder: "Emilio Aguinaldo".to_string(),
                year_of_build: "2019".to_string(),
                engine_make: "Yanmar".to_string(),
                engine_serial: "YM-56789".to_string(),
                horse_power: "250 HP".to_string(),
                number_of_cylinders: "6".to_string(),
                place_of_admeasurement: "Paluan, Occidental Mindoro".to_string(),
                register_length: "15.5".to_string(),
                register_breadth: "4.2".to_string(),
                register_depth: "2.1".to_string(),
                tonnage_length: "14.8".to_string(),
                tonnage_breadth: "4.0".to_string(),
                tonnage_depth: "2.0".to_string(),
                gross_tonnage: "45".to_string(),
                net_tonnage: "25".to_string(),
            },
            created_at: "8/29/2025".to_string(),
            updated_at: "8/29/2025".to_string(),
        }
    }
}

impl fmt::Display for BoatRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.details.owner_name, self.details.boat_name)
    }
}

/// What the form hands back on a successful submit. The receiver decides
/// whether this becomes a new record or replaces an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoatSubmission {
    pub details: BoatDetails,
    pub updated_at: String,
}

/// Render a date as `M/D/YYYY` without zero padding.
pub fn date_stamp(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Inverse of [`date_stamp`]. Returns `None` for anything that is not a real
/// calendar date in that shape.
pub fn parse_date_stamp(stamp: &str) -> Option<NaiveDate> {
    let mut parts = stamp.trim().split('/');
    let month = parts.next()?.trim().parse::<u32>().ok()?;
    let day = parts.next()?.trim().parse::<u32>().ok()?;
    let year = parts.next()?.trim().parse::<i32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn serialized_keys_follow_column_order() {
        let text = serde_json::to_string(&BoatRecord::seed()).unwrap();
        let columns = BoatRecord::columns();
        let mut positions: Vec<(usize, &str)> = columns
            .iter()
            .map(|key| (text.find(&format!("\"{key}\":")).unwrap(), *key))
            .collect();
        positions.sort_unstable();
        let serialized: Vec<&str> = positions.into_iter().map(|(_, key)| key).collect();
        assert_eq!(serialized, columns);

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json.as_object().unwrap().len(), columns.len());
        assert_eq!(json["ownerName"], "John Oliver G. Virola");
        assert_eq!(json["createdAt"], "8/29/2025");
    }

    #[test]
    fn column_values_line_up_with_headers() {
        let seed = BoatRecord::seed();
        let columns = BoatRecord::columns();
        let values = seed.column_values();
        assert_eq!(columns.len(), values.len());
        assert_eq!(columns[0], "id");
        assert_eq!(values[0], "1");
        let boat_idx = columns.iter().position(|c| *c == "boatName").unwrap();
        assert_eq!(values[boat_idx], "John Oliver");
        assert_eq!(*columns.last().unwrap(), "updatedAt");
    }

    #[test]
    fn blank_details_report_every_field_missing() {
        let blank = BoatDetails::blank();
        assert_eq!(blank.missing_fields(), BoatField::FORM_ORDER.to_vec());
    }

    #[test]
    fn whitespace_counts_as_missing() {
        let mut details = BoatRecord::seed().details;
        details.set(BoatField::GrossTonnage, "   ");
        assert_eq!(details.missing_fields(), vec![BoatField::GrossTonnage]);
    }

    #[test]
    fn from_record_copies_editable_fields() {
        let seed = BoatRecord::seed();
        let details = BoatDetails::from_record(&seed);
        for field in BoatField::ALL {
            assert_eq!(details.get(field), seed.details.get(field));
        }
    }

    #[test]
    fn get_mut_targets_the_named_field() {
        let mut details = BoatDetails::blank();
        details.get_mut(BoatField::TonnageDepth).push_str("2.0");
        assert_eq!(details.tonnage_depth, "2.0");
        assert_eq!(details.get(BoatField::TonnageDepth), "2.0");
        assert_eq!(BoatField::TonnageDepth.index(), 15);
    }

    #[test]
    fn form_order_puts_boat_name_before_address() {
        assert_eq!(
            &BoatField::FORM_ORDER[..3],
            &[
                BoatField::OwnerName,
                BoatField::BoatName,
                BoatField::OwnerAddress
            ]
        );
        assert_eq!(BoatField::OwnerAddress.form_index(), 2);
        let mut sorted = BoatField::FORM_ORDER.to_vec();
        sorted.sort_by_key(|field| field.index());
        assert_eq!(sorted, BoatField::ALL.to_vec());
    }

    #[test]
    fn sections_split_owner_and_measurements() {
        let owner = BoatField::ALL
            .iter()
            .filter(|f| f.section() == Section::OwnerDetails)
            .count();
        assert_eq!(owner, 10);
        assert_eq!(BoatField::NetTonnage.section(), Section::BoatMeasurements);
    }

    #[test]
    fn date_stamp_has_no_padding() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 9).unwrap();
        assert_eq!(date_stamp(date), "8/9/2025");
        assert_eq!(parse_date_stamp("8/9/2025"), Some(date));
        assert_eq!(parse_date_stamp("08/09/2025"), Some(date));
        assert_eq!(parse_date_stamp("2/30/2025"), None);
        assert_eq!(parse_date_stamp("yesterday"), None);
        assert_eq!(parse_date_stamp("1/2/3/4"), None);
    }
}
