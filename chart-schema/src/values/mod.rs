/// The chart-values model. Serde attributes carry the wire names,
/// optionality and flattening; schemars derives the schema from them.
/// Definition names follow the source type names exactly, since flavor
/// rules address definitions by name. Chart-local types keep their
/// lowercase names.
pub mod cap_operator;
mod chart;
pub mod kube;
pub mod service_operator;

pub use chart::*;

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde_json::json;

    #[test]
    fn test_schema_names() {
        assert_eq!(ChartValue::schema_name(), "chartValue");
        assert_eq!(ConfigurableChartValue::schema_name(), "configurableChartValue");
        assert_eq!(ServiceBindingExt::schema_name(), "serviceBindingExt");
        assert_eq!(kube::Quantity::schema_name(), "Quantity");
    }

    #[test]
    fn test_values_document_deserializes() {
        let values: ConfigurableChartValue = serde_json::from_value(json!({
            "app": {
                "domains": {"primary": "example.com", "additionalDomainRefs": []},
                "istioIngressGatewayLabels": {"app": "istio-ingressgateway"}
            },
            "btp": {
                "globalAccountId": "ga",
                "provider": {"subdomain": "sub", "tenantId": "t1"}
            },
            "serviceInstances": {
                "xsuaa": {
                    "name": "bookshop-uaa",
                    "serviceOfferingName": "xsuaa",
                    "servicePlanName": "application"
                }
            },
            "serviceBindings": {
                "uaa": {
                    "name": "bookshop-uaa-bind",
                    "serviceInstanceName": "bookshop-uaa",
                    "secretName": "bookshop-uaa-secret"
                }
            },
            "workloads": {"server": {"image": "bookshop:1"}}
        }))
        .unwrap();

        let instance = &values.service_instances["xsuaa"];
        assert_eq!(instance.name, "bookshop-uaa");
        assert_eq!(instance.spec.service_offering_name, "xsuaa");
        assert!(instance.json_parameters.is_none());
        assert_eq!(
            values.service_bindings["uaa"].spec.secret_name.as_deref(),
            Some("bookshop-uaa-secret")
        );
        assert_eq!(values.workloads["server"].image, "bookshop:1");
    }

    #[test]
    fn test_optional_fields_are_omitted_when_empty() {
        let value = serde_json::to_value(WorkloadDefinition {
            image: "x".to_string(),
        })
        .unwrap();
        assert_eq!(value, json!({"image": "x"}));

        let value = serde_json::to_value(kube::ResourceRequirements::default()).unwrap();
        assert_eq!(value, json!({}));
    }
}
