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

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cim::DEFAULT_FOLD_WIDTH;
use crate::config::ConnectionOverrides;
use crate::shrub::{CollectionStrategy, ShrubFilters};
use crate::ui::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "wbemcli",
    version,
    about = "WBEM client - explore the associations of CIM instances",
    long_about = "wbemcli is a command line client for WBEM servers.\nIt shows the association shrub of a CIM instance: every association the instance\ntakes part in, the role it plays, the role at the other end and the instances found there.\nServers are given on the command line, through WBEMCLI_* environment variables or as\nnamed connections in ~/.config/wbemcli/connections.yaml. A mock server backed by a YAML\nrepository file can be used instead of a real server.",
    after_help = "EXAMPLES:\n  Shrub of an instance:          wbemcli -m repo.yaml shrub 'TST_Person.name=\"Mike\"'\n  Summary as a table:            wbemcli -N dev -o table shrub -S 'TST_Person.name=\"Mike\"'\n  Restrict to one association:   wbemcli -N dev shrub -a TST_Lineage 'TST_Person.name=\"Mike\"'\n  Show the current connection:   wbemcli -N prod connection show"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 's',
        long,
        env = "WBEMCLI_SERVER",
        help = "WBEM server URI: [{scheme}://]{host}[:{port}]\nThe scheme is http or https and defaults to https"
    )]
    pub server: Option<String>,

    #[arg(
        short = 'm',
        long,
        env = "WBEMCLI_MOCK_SERVER",
        conflicts_with = "server",
        help = "YAML repository file served by a mock WBEM server instead of a real server"
    )]
    pub mock_server: Option<PathBuf>,

    #[arg(
        short = 'N',
        long,
        env = "WBEMCLI_NAME",
        help = "Name of a connection from the configuration file"
    )]
    pub name: Option<String>,

    #[arg(
        short = 'd',
        long,
        env = "WBEMCLI_DEFAULT_NAMESPACE",
        help = "Namespace used for paths without one [default: root/cimv2]"
    )]
    pub default_namespace: Option<String>,

    #[arg(short = 'u', long, env = "WBEMCLI_USER", help = "User name for the WBEM server")]
    pub user: Option<String>,

    #[arg(
        short = 'p',
        long,
        env = "WBEMCLI_PASSWORD",
        hide_env_values = true,
        help = "Password for the WBEM server\nPrompted for when a user is given without a password"
    )]
    pub password: Option<String>,

    #[arg(
        short = 't',
        long,
        env = "WBEMCLI_TIMEOUT",
        help = "Operation timeout in seconds, 0 to 300 [default: 30]"
    )]
    pub timeout: Option<u64>,

    #[arg(
        long,
        env = "WBEMCLI_NOVERIFY",
        help = "Do not verify the server certificate"
    )]
    pub noverify: bool,

    #[arg(long, env = "WBEMCLI_CERTFILE", help = "Client certificate file")]
    pub certfile: Option<PathBuf>,

    #[arg(
        long,
        env = "WBEMCLI_KEYFILE",
        help = "Client private key file, requires --certfile"
    )]
    pub keyfile: Option<PathBuf>,

    #[arg(
        long,
        env = "WBEMCLI_CA_CERTS",
        help = "CA certificates used to verify the server certificate"
    )]
    pub ca_certs: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_enum,
        default_value_t = OutputFormat::Tree,
        help = "Output format of the shrub: tree or one of the table formats"
    )]
    pub output_format: OutputFormat,

    #[arg(
        long,
        env = "WBEMCLI_CONFIG",
        help = "Configuration file path\nConfig loading priority:\n  1. This flag's value\n  2. Current directory (./connections.yaml)\n  3. User config (~/.config/wbemcli/connections.yaml)"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        short = 'v',
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Show the association shrub of an instance",
        long_about = "Shows the associations of an instance as a tree or a table.\nFor every association class that references the instance, the role the instance plays,\nthe role at the other end (result role) and the associated classes and instances are listed.\nReference classes whose representative instance cannot be read are skipped.",
        after_help = "Examples:\n  wbemcli -m repo.yaml shrub 'TST_Person.name=\"Mike\"'\n  wbemcli -m repo.yaml -o psql shrub -S 'TST_Person.name=\"Mike\"'\n  wbemcli -m repo.yaml shrub -r parent -R child 'TST_Person.name=\"Mike\"'"
    )]
    Shrub(ShrubArgs),

    #[command(
        about = "Show or export connection definitions",
        subcommand
    )]
    Connection(ConnectionCommand),
}

#[derive(clap::Args, Debug)]
pub struct ShrubArgs {
    #[arg(help = "Instance path as WBEM URI, e.g. 'CIM_Foo.key=\"x\"'")]
    pub instancename: String,

    #[arg(short = 'r', long, help = "Only show this role of the instance")]
    pub role: Option<String>,

    #[arg(short = 'a', long, help = "Only show this association class")]
    pub assoc_class: Option<String>,

    #[arg(short = 'R', long, help = "Only show this role at the other end")]
    pub result_role: Option<String>,

    #[arg(
        short = 'c',
        long,
        help = "Only show associated instances of this class or its subclasses"
    )]
    pub result_class: Option<String>,

    #[arg(
        short = 'n',
        long,
        help = "Namespace of the instance when the path has none"
    )]
    pub namespace: Option<String>,

    #[arg(
        short = 'S',
        long,
        help = "Show instance counts instead of instance paths"
    )]
    pub summary: bool,

    #[arg(
        long,
        default_value_t = DEFAULT_FOLD_WIDTH,
        help = "Fold instance paths longer than this in table output"
    )]
    pub fold_width: usize,

    #[arg(
        long,
        help = "Warn about and list association classes that were skipped"
    )]
    pub show_skipped: bool,

    #[arg(
        long,
        value_enum,
        default_value_t = CollectionStrategy::PerClassQuery,
        help = "How associated instances are grouped by class\n  per-class - one request per associated class\n  grouped   - group the first response by class"
    )]
    pub strategy: CollectionStrategy,
}

impl ShrubArgs {
    pub fn filters(&self) -> ShrubFilters {
        ShrubFilters {
            role: self.role.clone(),
            assoc_class: self.assoc_class.clone(),
            result_role: self.result_role.clone(),
            result_class: self.result_class.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConnectionCommand {
    #[command(about = "Show the current connection definition")]
    Show,

    #[command(about = "List the connections of the configuration file")]
    List,

    #[command(about = "Print export statements for the current connection")]
    Export,
}

impl Cli {
    pub fn connection_overrides(&self) -> ConnectionOverrides {
        ConnectionOverrides {
            server: self.server.clone(),
            mock_server: self.mock_server.clone(),
            name: self.name.clone(),
            default_namespace: self.default_namespace.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            timeout: self.timeout,
            noverify: self.noverify,
            certfile: self.certfile.clone(),
            keyfile: self.keyfile.clone(),
            ca_certs: self.ca_certs.clone(),
        }
    }
}
