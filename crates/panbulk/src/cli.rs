//! Clap derive structure for `panbulk`.
//!
//! The tool takes no arguments; clap is used only to render usage text.

use clap::{Parser, ValueEnum};

/// panbulk -- bulk-create VLAN subinterfaces on a PAN-OS firewall
#[derive(Debug, Parser)]
#[command(
    name = "panbulk",
    version,
    about = "Bulk-create VLAN subinterfaces on a PAN-OS firewall",
    long_about = "Creates a layer-3 ethernet interface, then creates one tagged subinterface \
        per configured address in a single bulk request, and binds the whole batch to a \
        virtual router and a security zone inside one virtual system.\n\n\
        panbulk takes no command-line arguments. Passing any argument prints this text \
        and exits without contacting the firewall. Changes are written to the candidate \
        configuration; commit them on the firewall when ready.",
    after_long_help = "CONFIGURATION:\n  \
        Read from $PANBULK_CONFIG, else the platform config dir (panbulk/config.toml).\n  \
        Every key can be overridden with a PANBULK_<KEY> environment variable.\n\n  \
        host                management address or URL      [10.10.10.1]\n  \
        username            API user                        [admin]\n  \
        password            plaintext password (prefer PANBULK_PASSWORD or the keyring)\n  \
        base_interface      interface to split              [ethernet1/5]\n  \
        addresses           address/prefix per VLAN tag, tag 1 first\n  \
        tag_count           tags to create                  [number of addresses]\n  \
        vsys                target vsys                     [random pick]\n  \
        zone                security zone                   [local_vlans]\n  \
        virtual_router      virtual router                  [default]\n  \
        comment             subinterface comment            [comment]\n  \
        management_profile  interface management profile\n  \
        mtu                 subinterface MTU                [1400]\n  \
        insecure            accept self-signed certificates [false]\n  \
        ca_cert             CA file to verify the firewall certificate\n  \
        timeout             request timeout in seconds      [30]\n  \
        output              report format: table, json, yaml [table]\n  \
        log_level           log filter when RUST_LOG is unset [warn]\n\n\
        PASSWORD:\n  \
        PANBULK_PASSWORD, then the system keyring (service 'panbulk', account \
        '<host>/password'), then the config file."
)]
pub struct Cli {}

/// Report format, from the `output` config key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}
