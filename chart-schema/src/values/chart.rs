use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::cap_operator::{ServiceExposure, TenantOperations, WorkloadDetails};
use super::service_operator::{ServiceBindingSpec, ServiceInstanceSpec};

/// Values of the chart with fixed workload templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[schemars(rename = "chartValue")]
pub struct ChartValue {
    pub app: App,
    pub btp: Btp,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_pull_secrets: Vec<String>,
    pub service_instances: BTreeMap<String, ServiceInstanceExt>,
    pub service_bindings: BTreeMap<String, ServiceBindingExt>,
    pub workloads: BTreeMap<String, WorkloadDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_operations: Option<TenantOperations>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content_jobs: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_exposures: Vec<ServiceExposure>,
}

/// Values of the chart whose workloads are rendered from user templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[schemars(rename = "configurableChartValue")]
pub struct ConfigurableChartValue {
    pub app: App,
    pub btp: Btp,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_pull_secrets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hana_instance_id: Option<String>,
    pub service_instances: BTreeMap<String, ServiceInstanceExt>,
    pub service_bindings: BTreeMap<String, ServiceBindingExt>,
    pub workloads: BTreeMap<String, WorkloadDefinition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[schemars(rename = "app")]
pub struct App {
    pub domains: Domains,
    pub istio_ingress_gateway_labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Domains {
    pub primary: String,
    pub additional_domain_refs: Vec<DomainRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DomainRef {
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[schemars(rename = "btp")]
pub struct Btp {
    pub global_account_id: String,
    pub provider: Provider,
}

/// Provider subaccount.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[schemars(rename = "provider")]
pub struct Provider {
    pub subdomain: String,
    pub tenant_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(rename = "workloadDefinition")]
pub struct WorkloadDefinition {
    pub image: String,
}

/// A service instance keyed by its chart name; the operator spec is inlined.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(rename = "serviceInstanceExt")]
pub struct ServiceInstanceExt {
    pub name: String,
    #[serde(flatten)]
    pub spec: ServiceInstanceSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_parameters: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[schemars(rename = "serviceBindingExt")]
pub struct ServiceBindingExt {
    pub name: String,
    #[serde(flatten)]
    pub spec: ServiceBindingSpec,
}
