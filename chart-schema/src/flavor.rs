/// Flavor catalog. A flavor is a root type, an ordered rule list and the
/// default destinations of its document. Adding a flavor means adding an
/// entry here; the pipeline has no per-flavor branches.
use crate::patch::{Edit, Keyword, Rule};
use crate::reflect::{reflect, ReflectError};
use crate::schema::{Document, InstanceType};
use crate::values;

#[derive(Debug, Clone, Copy)]
pub struct Flavor {
    pub name: &'static str,
    /// Reflects the root type into a draft.
    pub draft: fn() -> Result<Document, ReflectError>,
    pub rules: &'static [Rule],
    /// Relative to the run's root directory.
    pub destinations: &'static [&'static str],
}

impl Flavor {
    /// A fresh draft for this flavor; nothing is shared between calls.
    pub fn reflect(&self) -> Result<Document, ReflectError> {
        (self.draft)()
    }
}

const OPEN_RAW_EXTENSION: Rule = Rule::new("RawExtension", Edit::SetAdditionalProperties(true));

const BINDING_REQUIRED: Rule = Rule::new(
    "serviceBindingExt",
    Edit::SetRequired(&["name", "serviceInstanceName", "secretName"]),
);

const CHART_RULES: &[Rule] = &[
    OPEN_RAW_EXTENSION,
    Rule::new("Quantity", Edit::SetType(InstanceType::String)),
    Rule::new("Quantity", Edit::Drop(Keyword::Properties)),
    Rule::new("Quantity", Edit::Drop(Keyword::Required)),
    BINDING_REQUIRED,
    Rule::new("chartValue", Edit::SetAdditionalProperties(true)),
];

const CONFIGURABLE_CHART_RULES: &[Rule] = &[
    OPEN_RAW_EXTENSION,
    BINDING_REQUIRED,
    Rule::new("workloadDefinition", Edit::SetAdditionalProperties(true)),
    Rule::new("configurableChartValue", Edit::SetAdditionalProperties(true)),
];

/// Chart with fixed workload templates.
pub const CHART: Flavor = Flavor {
    name: "chart",
    draft: reflect::<values::ChartValue>,
    rules: CHART_RULES,
    destinations: &[
        "files/chart/values.schema.json",
        "test/files/expectedChart/values.schema.json",
    ],
};

/// Chart whose workloads are described by user templates.
pub const CONFIGURABLE_CHART: Flavor = Flavor {
    name: "configurable-chart",
    draft: reflect::<values::ConfigurableChartValue>,
    rules: CONFIGURABLE_CHART_RULES,
    destinations: &["files/configurableTemplatesChart/values.schema.json"],
};

static CATALOG: &[Flavor] = &[CHART, CONFIGURABLE_CHART];

/// All known flavors in run order.
pub fn catalog() -> &'static [Flavor] {
    CATALOG
}

pub fn find(name: &str) -> Option<&'static Flavor> {
    CATALOG.iter().find(|f| f.name == name)
}
