// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{Context, Result};

use crate::cim::ObjectPath;
use crate::cli::ShrubArgs;
use crate::connection::WbemConnection;
use crate::shrub::{AssociationShrub, ShrubOptions, SkipPolicy};
use crate::ui::{OutputFormat, OutputFormatter};

/// Parse the instance name argument, placing it in `namespace` when it has
/// no namespace of its own.
pub fn parse_instance_name(instancename: &str, namespace: Option<&str>) -> Result<ObjectPath> {
    let mut path = ObjectPath::from_wbem_uri(instancename)
        .with_context(|| format!("Invalid instance name '{instancename}'"))?;

    if !path.is_instance() {
        anyhow::bail!(
            "'{}' is a class path. The shrub command requires an instance path with key bindings, e.g. 'CIM_Foo.key=\"x\"'",
            instancename
        );
    }

    if path.namespace.is_none()
        && let Some(namespace) = namespace
    {
        path = path.with_namespace(namespace);
    }
    Ok(path)
}

/// Build the shrub of the instance named in `args` and render it.
pub async fn show_shrub(
    conn: &dyn WbemConnection,
    args: &ShrubArgs,
    output_format: OutputFormat,
) -> Result<String> {
    let source = parse_instance_name(&args.instancename, args.namespace.as_deref())?;

    let options = ShrubOptions {
        filters: args.filters(),
        skip_policy: if args.show_skipped {
            SkipPolicy::Warn
        } else {
            SkipPolicy::Silent
        },
        strategy: args.strategy,
    };

    let shrub = AssociationShrub::build(conn, &source, &options)
        .await
        .with_context(|| format!("Failed to build association shrub of {source}"))?;

    let mut output = match output_format.table_format() {
        None => shrub
            .to_tree(args.summary)
            .context("Failed to render association shrub")?
            .render(),
        Some(format) => {
            let table = shrub
                .to_table(args.summary, args.fold_width)
                .context("Failed to render association shrub")?;
            format!(
                "{}\n{}\n",
                OutputFormatter::format_header(table.title()),
                table.render(format)
            )
        }
    };

    let skipped = shrub.skipped_report();
    if !skipped.is_empty() {
        output.push('\n');
        for line in skipped {
            output.push_str(&line);
            output.push('\n');
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instance_name_applies_namespace() {
        let path = parse_instance_name("TST_Person.name=\"Mike\"", Some("root/test")).unwrap();
        assert_eq!(path.namespace.as_deref(), Some("root/test"));

        let path =
            parse_instance_name("/root/cimv2:TST_Person.name=\"Mike\"", Some("root/test")).unwrap();
        assert_eq!(path.namespace.as_deref(), Some("root/cimv2"));
    }

    #[test]
    fn test_parse_instance_name_rejects_class_path() {
        let err = parse_instance_name("TST_Person", None).unwrap_err();
        assert!(err.to_string().contains("is a class path"));
    }

    #[test]
    fn test_parse_instance_name_rejects_garbage() {
        let err = parse_instance_name("", None).unwrap_err();
        assert!(err.to_string().contains("Invalid instance name"));
    }
}
