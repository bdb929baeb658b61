use serde::{Deserialize, Serialize};

/// A listing field that can be merged, drafted, written or diffed.
///
/// Not every field takes part in every step: `Location`, `Categories` and
/// `CategoryFlags` only exist on the combined view, while `Latitude`,
/// `Longitude` and `ClosedDays` are write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingField {
    Name,
    Address,
    Phone,
    Website,
    Location,
    Latitude,
    Longitude,
    OpeningHours,
    Categories,
    Description,
    CategoryFlags,
    ClosedDays,
}

impl ListingField {
    /// Fields that an approval may write back to the listing.
    pub const WRITABLE: [ListingField; 9] = [
        ListingField::Name,
        ListingField::Address,
        ListingField::Phone,
        ListingField::Website,
        ListingField::Latitude,
        ListingField::Longitude,
        ListingField::OpeningHours,
        ListingField::Description,
        ListingField::ClosedDays,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingField::Name => "name",
            ListingField::Address => "address",
            ListingField::Phone => "phone",
            ListingField::Website => "website",
            ListingField::Location => "location",
            ListingField::Latitude => "latitude",
            ListingField::Longitude => "longitude",
            ListingField::OpeningHours => "opening_hours",
            ListingField::Categories => "categories",
            ListingField::Description => "description",
            ListingField::CategoryFlags => "category_flags",
            ListingField::ClosedDays => "closed_days",
        }
    }

    pub fn is_writable(&self) -> bool {
        Self::WRITABLE.contains(self)
    }
}

impl std::fmt::Display for ListingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ListingField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(ListingField::Name),
            "address" => Ok(ListingField::Address),
            "phone" => Ok(ListingField::Phone),
            "website" => Ok(ListingField::Website),
            "location" => Ok(ListingField::Location),
            "latitude" | "lat" => Ok(ListingField::Latitude),
            "longitude" | "lng" => Ok(ListingField::Longitude),
            "opening_hours" | "hours" => Ok(ListingField::OpeningHours),
            "categories" => Ok(ListingField::Categories),
            "description" => Ok(ListingField::Description),
            "category_flags" => Ok(ListingField::CategoryFlags),
            "closed_days" => Ok(ListingField::ClosedDays),
            _ => Err(anyhow::anyhow!("Invalid listing field: {}", s)),
        }
    }
}

/// Which source supplied a field's final value.
///
/// Serialized as `"user"`, `"thirdparty"` or `""` (no value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Provenance {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "thirdparty")]
    ThirdParty,
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::User => "user",
            Provenance::ThirdParty => "thirdparty",
            Provenance::Unset => "",
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, Provenance::Unset)
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
