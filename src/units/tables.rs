//! Built-in unit tables.
//!
//! All tables are compile-time perfect-hash maps: they are built once, never
//! written to, and can be read from any number of threads.
//!
//! | Table                        | Maps                                 | Example                  |
//! |------------------------------|--------------------------------------|--------------------------|
//! | [`SI_PREFIXES`]              | prefix name to multiplier            | `kilo` -> `1e3`          |
//! | [`SI_PREFIX_ABBREVIATIONS`]  | one-letter prefix to prefix name     | `k` -> `kilo`            |
//! | [`UNIT_ABBREVIATIONS`]       | unit symbol to unit name             | `m` -> `meter`           |
//! | [`ALTERNATIVE_UNITS`]        | non-SI unit to multiplier and base   | `inch` -> `2.54 centimeter` |

use phf::phf_map;

pub static SI_PREFIXES: phf::Map<&'static str, f64> = phf_map! {
    "centi" => 1e-2,
    "milli" => 1e-3,
    "micro" => 1e-6,
    "nano" => 1e-9,
    "kilo" => 1e3,
    "mega" => 1e6,
    "giga" => 1e9,
    "tera" => 1e12,
    "peta" => 1e15,
    "exa" => 1e18,
};

pub static SI_PREFIX_ABBREVIATIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "m" => "milli",
    "u" => "micro",
    "n" => "nano",
    "k" => "kilo",
    "c" => "centi",
};

pub static UNIT_ABBREVIATIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "g" => "gram",
    "s" => "second",
    "m" => "meter",
    "h" => "hour",
    "min" => "minute",
    "in" => "inch",
    "ft" => "foot",
    "b" => "bit",
    "B" => "byte",
};

pub static ALTERNATIVE_UNITS: phf::Map<&'static str, (f64, &'static str)> = phf_map! {
    // Length
    "inch" => (2.54, "centimeter"),
    "foot" => (30.48, "centimeter"),
    "yard" => (0.9144, "meter"),
    "mile" => (1.60934, "kilometer"),
    // Mass
    "pound" => (0.453592, "kilogram"),
    "stone" => (6.35029, "kilogram"),
    // Time
    "minute" => (60.0, "second"),
    "hour" => (60.0, "minute"),
    "day" => (24.0, "hour"),
    "week" => (7.0, "day"),
    "month" => (30.0, "day"),
    "year" => (12.0, "month"),
    "century" => (100.0, "year"),
    "millennium" => (1000.0, "year"),
    // Data
    "kb" => (1e3, "bit"),
    "mb" => (1e6, "bit"),
    "gb" => (1e9, "bit"),
    "tb" => (1e12, "bit"),
    "pb" => (1e15, "bit"),
    "byte" => (8.0, "bit"),
    "KB" => (1e3, "byte"),
    "MB" => (1e6, "byte"),
    "GB" => (1e9, "byte"),
    "TB" => (1e12, "byte"),
    "PB" => (1e15, "byte"),
};
