//! Physical locations stock is tracked against.
//!
//! Branches are static reference data; the catalog never writes them. Their
//! ids are the foreign-key domain of the `frame_branches` table.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchType {
    Clinic,
    Optical,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Branch {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub phone2: Option<String>,
    pub hours: String,
    pub branch_type: BranchType,
    pub coordinates: Coordinates,
}

impl Branch {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        branch_type: BranchType,
        coordinates: Coordinates,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: String::new(),
            phone: String::new(),
            phone2: None,
            hours: String::new(),
            branch_type,
            coordinates,
        }
    }

    fn with_contact(
        mut self,
        address: &str,
        phone: &str,
        phone2: Option<&str>,
        hours: &str,
    ) -> Self {
        self.address = address.to_string();
        self.phone = phone.to_string();
        self.phone2 = phone2.map(str::to_string);
        self.hours = hours.to_string();
        self
    }
}

/// The four branches of the deployment.
pub fn default_branches() -> Vec<Branch> {
    vec![
        Branch::new(
            "11111111-1111-4111-8111-111111111111",
            "Bisrate Gebriel Branch",
            BranchType::Clinic,
            Coordinates { lat: 9.005401, lng: 38.763611 },
        )
        .with_contact(
            "In front of Home Depot Sun Building, 3rd floor",
            "+251 11369 2033",
            Some("+251 94154 5454"),
            "Mon-Sat: 8:00 AM - 6:00 PM",
        ),
        Branch::new(
            "22222222-2222-4222-8222-222222222222",
            "Meskel Flower Branch",
            BranchType::Clinic,
            Coordinates { lat: 9.0234, lng: 38.7891 },
        )
        .with_contact(
            "In front of Dream Liner Hotel James Building, 4th Floor",
            "+251 11558 4428",
            Some("+251 94154 5454"),
            "Mon-Sat: 8:00 AM - 6:00 PM",
        ),
        Branch::new(
            "33333333-3333-4333-8333-333333333333",
            "Bole Branch",
            BranchType::Optical,
            Coordinates { lat: 9.0012, lng: 38.7421 },
        )
        .with_contact(
            "In front of You Go Church, Leamir Building, 2nd Floor",
            "+251 953377777",
            None,
            "Mon-Sun: 9:00 AM - 8:00 PM",
        ),
        Branch::new(
            "44444444-4444-4444-8444-444444444444",
            "Olympia Branch",
            BranchType::Optical,
            Coordinates { lat: 9.0182, lng: 38.8012 },
        )
        .with_contact(
            "Olympia, on the way to Bambis Adjacent to ABC Trading, Hailu Wolde Building, Ground Floor",
            "+251 946130000",
            None,
            "Mon-Sun: 9:00 AM - 7:00 PM",
        ),
    ]
}

/// Looks a branch name up by id.
pub fn branch_name<'a>(branches: &'a [Branch], id: &str) -> Option<&'a str> {
    branches
        .iter()
        .find(|b| b.id == id)
        .map(|b| b.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directory() {
        let branches = default_branches();
        assert_eq!(branches.len(), 4);
        assert_eq!(
            branch_name(&branches, "33333333-3333-4333-8333-333333333333"),
            Some("Bole Branch")
        );
        assert_eq!(branch_name(&branches, "unknown"), None);
        assert_eq!(
            branches.iter().filter(|b| b.branch_type == BranchType::Clinic).count(),
            2
        );
    }
}
