//! Directory entity models as returned by the upstream REST backend.
//!
//! These mirror the backend's camelCase JSON. Only the fields the engines
//! read are modelled; unknown fields are ignored on deserialization.

use serde::{Deserialize, Serialize};

use crate::pagination::HasId;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Employee
// ---------------------------------------------------------------------------

/// An employee record. `reports_to_id == None` marks a top-level employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: DbId,
    #[serde(default)]
    pub reports_to_id: Option<DbId>,
    #[serde(default)]
    pub assigned_branch_id: Option<DbId>,
    #[serde(default)]
    pub assigned_department_id: Option<DbId>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub is_draft: bool,
}

impl Employee {
    /// Whether this employee has no manager.
    pub fn is_top_level(&self) -> bool {
        self.reports_to_id.is_none()
    }

    /// The name to show for this employee, falling back to first + last
    /// when the backend did not fill `fullName`.
    pub fn display_name(&self) -> String {
        if !self.full_name.trim().is_empty() {
            return self.full_name.clone();
        }
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl HasId for Employee {
    fn id(&self) -> DbId {
        self.id
    }
}

/// Body for `PUT /Employees/{id}/ReportsTo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportsTo {
    pub reports_to_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Tenant-scoped entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: DbId,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyLicense {
    pub id: DbId,
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySettings {
    pub id: DbId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: DbId,
    #[serde(default)]
    pub name: String,
}

impl HasId for Branch {
    fn id(&self) -> DbId {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: DbId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parent_department_id: Option<DbId>,
}

/// The caller's own employee profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    pub id: DbId,
    #[serde(default)]
    pub employee_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Enriched views
// ---------------------------------------------------------------------------

/// An employee together with the names of the entities it references.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetails {
    pub employee: Employee,
    pub branch_name: Option<String>,
    /// Department ancestry, root department first.
    pub department_path: Vec<String>,
    pub manager_name: Option<String>,
}
