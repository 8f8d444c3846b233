use serde_json::Value;
use std::collections::BTreeMap;

use crate::resources::{BlueprintParam, OwnerParam, TemplateParam};

pub type Params = BTreeMap<String, Value>;

/// Build the `params` exposed to a template. Layers are merged from the
/// lowest to the highest precedence: template defaults, supply chain params,
/// resource params and finally the params of the owner.
pub fn build_params(
    template: &[TemplateParam],
    supply_chain: &[BlueprintParam],
    resource: &[BlueprintParam],
    owner: &[OwnerParam],
) -> Params {
    merge_layers(&[
        &template_defaults(template),
        &blueprint_params(supply_chain),
        &blueprint_params(resource),
        &owner_params(owner),
    ])
}

/// Merges `src` on top of `dst`, without modifying either of them
pub fn merge_into(dst: &Params, src: &Params) -> Params {
    let mut res = dst.clone();
    res.extend(src.iter().map(|(k, v)| (k.clone(), v.clone())));
    res
}

/// Merges all the layers, a layer overrides the keys of the ones before it
pub fn merge_layers(layers: &[&Params]) -> Params {
    layers
        .iter()
        .fold(Params::new(), |acc, layer| merge_into(&acc, layer))
}

pub fn template_defaults(params: &[TemplateParam]) -> Params {
    params
        .iter()
        .map(|p| (p.name.clone(), p.default.clone().unwrap_or(Value::Null)))
        .collect()
}

pub fn blueprint_params(params: &[BlueprintParam]) -> Params {
    params
        .iter()
        .map(|p| (p.name.clone(), p.effective_value()))
        .collect()
}

pub fn owner_params(params: &[OwnerParam]) -> Params {
    params
        .iter()
        .map(|p| (p.name.clone(), p.value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::*;
    use serde_json::json;

    fn params(value: Value) -> Params {
        serde_json::from_value(value).unwrap()
    }

    #[rstest]
    #[case::disjoint(
        vec![json!({"a": 1}), json!({"b": 2}), json!({"c": 3}), json!({"d": 4})],
        json!({"a": 1, "b": 2, "c": 3, "d": 4})
    )]
    #[case::last_layer_wins(
        vec![json!({"a": 1, "b": 1}), json!({"a": 2}), json!({"a": 3, "c": 3}), json!({"a": 4})],
        json!({"a": 4, "b": 1, "c": 3})
    )]
    #[case::middle_layer_overrides_template(
        vec![json!({"registry": {"server": "foo"}}), json!({"registry": {"server": "bar"}}), json!({}), json!({})],
        json!({"registry": {"server": "bar"}})
    )]
    #[case::no_layers(vec![], json!({}))]
    fn merge_is_last_writer_wins(#[case] layers: Vec<Value>, #[case] expected: Value) {
        let layers: Vec<Params> = layers.into_iter().map(params).collect();
        let originals = layers.clone();

        let refs: Vec<&Params> = layers.iter().collect();
        let merged = merge_layers(&refs);

        assert_eq!(merged, params(expected));
        assert_eq!(layers, originals, "input layers must not be modified");
    }

    #[test]
    fn build_params_precedence() {
        let template = vec![
            TemplateParam {
                name: "registry".to_owned(),
                default: Some(json!({"server": "foo", "repository": "bar"})),
            },
            TemplateParam {
                name: "git_implementation".to_owned(),
                default: Some(json!("go-git")),
            },
            TemplateParam {
                name: "git_secret".to_owned(),
                default: None,
            },
        ];
        let supply_chain = vec![BlueprintParam {
            name: "registry".to_owned(),
            default: Some(json!({"server": "sc"})),
            value: None,
        }];
        let resource = vec![BlueprintParam {
            name: "git_implementation".to_owned(),
            default: None,
            value: Some(json!("libgit2")),
        }];
        let owner = vec![OwnerParam {
            name: "git_implementation".to_owned(),
            value: json!("owner"),
        }];

        let built = build_params(&template, &supply_chain, &resource, &owner);

        assert_eq!(
            built,
            params(json!({
                "registry": {"server": "sc"},
                "git_implementation": "owner",
                "git_secret": null,
            }))
        );
    }
}
