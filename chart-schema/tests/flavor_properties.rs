/// Properties every generated flavor document must hold.
use chart_schema::flavor::{self, CHART, CONFIGURABLE_CHART};
use chart_schema::output::render;
use chart_schema::patch::{patch, Edit, Keyword, Rule};
use chart_schema::pipeline::{build, generate};
use chart_schema::schema::{Additional, Document, InstanceType};
use pretty_assertions::assert_eq;

fn built(flavor: &chart_schema::Flavor) -> Document {
    build(flavor).unwrap_or_else(|e| panic!("{}: {e}", flavor.name))
}

/// Reflected `required` lists follow field order, which flattening may
/// interleave; compare them as sets.
fn sorted(names: &[String]) -> Vec<String> {
    let mut names = names.to_vec();
    names.sort();
    names
}

#[test]
fn test_patching_twice_is_byte_identical() {
    for flavor in flavor::catalog() {
        let once = built(flavor);
        let twice = patch(once.clone(), flavor.rules).unwrap();
        assert_eq!(render(&once).unwrap(), render(&twice).unwrap());
    }
}

#[test]
fn test_every_ref_resolves() {
    for flavor in flavor::catalog() {
        let doc = built(flavor);
        assert!(doc.dangling_refs().is_empty(), "{}", flavor.name);
        for reference in doc.refs() {
            let name = reference.strip_prefix("#/$defs/").unwrap();
            assert!(doc.definitions.contains_key(name), "{reference}");
        }
    }
}

#[test]
fn test_quantity_is_a_plain_string() {
    let doc = built(&CHART);
    let quantity = doc.definition("Quantity").unwrap();
    assert_eq!(quantity.instance_type, Some(InstanceType::String));
    assert!(quantity.properties.is_none());
    assert!(quantity.required.is_none());

    let value = serde_json::to_value(quantity).unwrap();
    assert!(value.get("properties").is_none());
    assert!(value.get("required").is_none());
}

#[test]
fn test_binding_requires_secret_name_in_every_flavor() {
    for flavor in flavor::catalog() {
        let draft = flavor.reflect().unwrap();
        assert_eq!(
            sorted(draft.definition("serviceBindingExt").unwrap().required()),
            ["name", "serviceInstanceName"].map(String::from)
        );

        let doc = built(flavor);
        assert_eq!(
            doc.definition("serviceBindingExt").unwrap().required(),
            ["name", "serviceInstanceName", "secretName"].map(String::from),
            "{}",
            flavor.name
        );
    }
}

#[test]
fn test_raw_extension_is_open_in_every_flavor() {
    for flavor in flavor::catalog() {
        let doc = built(flavor);
        assert_eq!(
            doc.definition("RawExtension").unwrap().allows_additional(),
            Some(true)
        );
    }
}

#[test]
fn test_root_containers_accept_extra_fields() {
    let chart = built(&CHART);
    assert_eq!(chart.root_name(), Some("chartValue"));
    assert_eq!(chart.definition("chartValue").unwrap().allows_additional(), Some(true));
    assert!(chart.definition("workloadDefinition").is_none());

    let configurable = built(&CONFIGURABLE_CHART);
    assert_eq!(configurable.root_name(), Some("configurableChartValue"));
    for name in ["configurableChartValue", "workloadDefinition"] {
        assert_eq!(
            configurable.definition(name).unwrap().allows_additional(),
            Some(true),
            "{name}"
        );
    }
    assert!(configurable.definition("Quantity").is_none());
    assert!(configurable.definition("WorkloadDetails").is_none());
}

#[test]
fn test_flattened_spec_fields_sit_on_service_instance() {
    let doc = built(&CHART);
    assert!(doc.definition("ServiceInstanceSpec").is_none());
    assert!(doc.definition("ServiceBindingSpec").is_none());

    let ext = doc.definition("serviceInstanceExt").unwrap();
    assert_eq!(ext.instance_type, Some(InstanceType::Object));
    assert_eq!(
        ext.property("name").unwrap().instance_type,
        Some(InstanceType::String)
    );
    assert!(ext.required().contains(&"name".to_string()));
    for field in [
        "serviceOfferingName",
        "servicePlanName",
        "parameters",
        "parametersFrom",
        "customTags",
        "jsonParameters",
    ] {
        let property = ext.property(field).unwrap_or_else(|| panic!("missing {field}"));
        assert!(property.properties.is_none(), "{field} should not nest");
    }
    assert_eq!(
        ext.property("parameters").unwrap().reference.as_deref(),
        Some("#/$defs/RawExtension")
    );
}

#[test]
fn test_service_instances_map_values_reference_extension() {
    let doc = built(&CHART);
    let root = doc.definition("chartValue").unwrap();
    let instances = root.property("serviceInstances").unwrap();
    assert_eq!(instances.instance_type, Some(InstanceType::Object));
    match &instances.additional_properties {
        Some(Additional::Schema(values)) => {
            assert_eq!(values.reference.as_deref(), Some("#/$defs/serviceInstanceExt"))
        }
        other => panic!("expected value schema, got {other:?}"),
    }
}

#[test]
fn test_common_details_inlined_into_workload_kinds() {
    let doc = built(&CHART);
    assert!(doc.definition("CommonDetails").is_none());
    for name in ["DeploymentDetails", "JobDetails"] {
        let def = doc.definition(name).unwrap();
        assert!(def.has_property("image"), "{name}");
        assert!(def.has_property("resources"), "{name}");
        assert_eq!(sorted(def.required()), ["image", "type"].map(String::from));
    }
}

#[test]
fn test_targeted_rules_leave_other_definitions_as_reflected() {
    let draft = CHART.reflect().unwrap();
    let rules = [
        Rule::new("RawExtension", Edit::SetAdditionalProperties(true)),
        Rule::new("Quantity", Edit::SetType(InstanceType::String)),
        Rule::new("Quantity", Edit::Drop(Keyword::Properties)),
        Rule::new("Quantity", Edit::Drop(Keyword::Required)),
    ];
    let doc = patch(draft.clone(), &rules).unwrap();

    assert_eq!(
        doc.definition("RawExtension").unwrap().allows_additional(),
        Some(true)
    );
    assert_eq!(
        doc.definition("Quantity").unwrap().instance_type,
        Some(InstanceType::String)
    );
    for (name, schema) in &draft.definitions {
        if name != "RawExtension" && name != "Quantity" {
            assert_eq!(doc.definition(name), Some(schema), "{name}");
        }
    }
}

#[test]
fn test_flavor_order_does_not_change_output() {
    let baseline: Vec<String> = flavor::catalog()
        .iter()
        .map(|f| generate(f).unwrap())
        .collect();
    let mut reversed: Vec<String> = flavor::catalog()
        .iter()
        .rev()
        .map(|f| generate(f).unwrap())
        .collect();
    reversed.reverse();
    assert_eq!(baseline, reversed);
}

#[test]
fn test_output_parses_back_to_the_same_document() {
    for flavor in flavor::catalog() {
        let text = generate(flavor).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\n  \"$defs\": {\n"));
        let back: Document = serde_json::from_str(&text).unwrap();
        assert_eq!(back, built(flavor));
    }
}

#[test]
fn test_draft_keeps_declared_wire_names() {
    let draft = CHART.reflect().unwrap();
    let quantity = draft.definition("Quantity").unwrap();
    assert_eq!(quantity.instance_type, Some(InstanceType::Object));
    assert_eq!(quantity.required(), ["Format".to_string()]);
    assert_eq!(quantity.allows_additional(), Some(false));

    let instance = draft.definition("serviceInstanceExt").unwrap();
    assert!(instance.has_property("servicePlanID"));
    let workload = draft.definition("WorkloadDetails").unwrap();
    assert!(workload.has_property("consumedBTPServices"));
    let rotation = draft.definition("CredentialsRotationPolicy").unwrap();
    assert!(rotation.has_property("rotatedBindingTTL"));

    let root = draft.definition("chartValue").unwrap();
    let mut names: Vec<_> = root.properties.iter().flatten().map(|(k, _)| k.as_str()).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "app",
            "btp",
            "contentJobs",
            "imagePullSecrets",
            "serviceBindings",
            "serviceExposures",
            "serviceInstances",
            "tenantOperations",
            "workloads",
        ]
    );
}
