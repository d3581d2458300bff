//! Built-in function signatures and namespace members.
//!
//! ## Learning: Static Data, Built Once
//!
//! The raw tables are `const` slices, so they live in the binary's read-only
//! data. The lookup structures over them are built on first use behind a
//! `Lazy` and then shared by reference; nothing mutates them afterwards.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// One built-in function signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuiltinFunctionSignature {
    /// Full name, e.g. `ta.sma`
    pub name: &'static str,
    pub return_type: &'static str,
    pub parameters: &'static [&'static str],
    pub documentation: &'static str,
}

impl BuiltinFunctionSignature {
    const fn new(
        name: &'static str,
        parameters: &'static [&'static str],
        return_type: &'static str,
        documentation: &'static str,
    ) -> Self {
        Self {
            name,
            return_type,
            parameters,
            documentation,
        }
    }

    /// `(source, length)`
    pub fn parameter_list(&self) -> String {
        format!("({})", self.parameters.join(", "))
    }

    /// Returns `(namespace, member)` for dotted names.
    pub fn split_namespace(&self) -> Option<(&'static str, &'static str)> {
        self.name.split_once('.')
    }
}

/// All overloads registered under one name, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverloadGroup {
    pub name: &'static str,
    pub overloads: Vec<BuiltinFunctionSignature>,
}

/// What a namespace member is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Function,
    Constant,
    Variable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NamespaceMember {
    pub namespace: &'static str,
    pub name: &'static str,
    pub kind: MemberKind,
}

impl NamespaceMember {
    /// `namespace.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}

use MemberKind::{Constant as C, Function as F, Variable as V};

#[rustfmt::skip]
const SIGNATURES: &[BuiltinFunctionSignature] = &[
    // ta
    BuiltinFunctionSignature::new("ta.sma", &["source", "length"], "series float", "Simple moving average."),
    BuiltinFunctionSignature::new("ta.ema", &["source", "length"], "series float", "Exponential moving average."),
    BuiltinFunctionSignature::new("ta.wma", &["source", "length"], "series float", "Weighted moving average."),
    BuiltinFunctionSignature::new("ta.rma", &["source", "length"], "series float", "Moving average used in RSI."),
    BuiltinFunctionSignature::new("ta.rsi", &["source", "length"], "series float", "Relative strength index."),
    BuiltinFunctionSignature::new(
        "ta.macd",
        &["source", "fastlen", "slowlen", "siglen"],
        "[series float, series float, series float]",
        "MACD line, signal line and histogram.",
    ),
    BuiltinFunctionSignature::new("ta.atr", &["length"], "series float", "Average true range."),
    BuiltinFunctionSignature::new("ta.stdev", &["source", "length", "biased"], "series float", "Standard deviation."),
    BuiltinFunctionSignature::new("ta.highest", &["source", "length"], "series float", "Highest value over a number of bars."),
    BuiltinFunctionSignature::new("ta.lowest", &["source", "length"], "series float", "Lowest value over a number of bars."),
    BuiltinFunctionSignature::new("ta.crossover", &["source1", "source2"], "series bool", "True when source1 crosses over source2."),
    BuiltinFunctionSignature::new("ta.crossunder", &["source1", "source2"], "series bool", "True when source1 crosses under source2."),
    BuiltinFunctionSignature::new("ta.cross", &["source1", "source2"], "series bool", "True when the two series cross."),
    BuiltinFunctionSignature::new("ta.change", &["source", "length"], "series float", "Difference between the current and a past value."),
    BuiltinFunctionSignature::new(
        "ta.bb",
        &["series", "length", "mult"],
        "[series float, series float, series float]",
        "Bollinger bands: middle, upper and lower.",
    ),
    // math
    BuiltinFunctionSignature::new("math.abs", &["number"], "series float", "Absolute value."),
    BuiltinFunctionSignature::new("math.round", &["number"], "series int", "Rounds to the nearest integer."),
    BuiltinFunctionSignature::new("math.round", &["number", "precision"], "series float", "Rounds to a number of decimal places."),
    BuiltinFunctionSignature::new("math.max", &["number0", "number1", "..."], "series float", "Largest of the arguments."),
    BuiltinFunctionSignature::new("math.min", &["number0", "number1", "..."], "series float", "Smallest of the arguments."),
    BuiltinFunctionSignature::new("math.sqrt", &["number"], "series float", "Square root."),
    BuiltinFunctionSignature::new("math.pow", &["base", "exponent"], "series float", "base raised to exponent."),
    BuiltinFunctionSignature::new("math.log", &["number"], "series float", "Natural logarithm."),
    // str
    BuiltinFunctionSignature::new(
        "str.format",
        &["formatString", "arg0", "arg1", "..."],
        "series string",
        "Formats a string with `{0}` style placeholders.",
    ),
    BuiltinFunctionSignature::new("str.tostring", &["value"], "series string", "Converts a value to a string."),
    BuiltinFunctionSignature::new("str.tostring", &["value", "format"], "series string", "Converts a value to a string using a format."),
    BuiltinFunctionSignature::new("str.length", &["string"], "series int", "Number of characters in a string."),
    BuiltinFunctionSignature::new("str.contains", &["source", "str"], "series bool", "True if source contains str."),
    // color
    BuiltinFunctionSignature::new("color.rgb", &["red", "green", "blue", "transp"], "series color", "Color from RGB components."),
    BuiltinFunctionSignature::new("color.new", &["color", "transp"], "series color", "Color with a transparency applied."),
    // array
    BuiltinFunctionSignature::new("array.new_float", &["size", "initial_value"], "array<float>", "New float array."),
    BuiltinFunctionSignature::new("array.push", &["id", "value"], "void", "Appends a value to an array."),
    BuiltinFunctionSignature::new("array.get", &["id", "index"], "series <type>", "Element at an index."),
    BuiltinFunctionSignature::new("array.size", &["id"], "series int", "Number of elements."),
    // request
    BuiltinFunctionSignature::new(
        "request.security",
        &["symbol", "timeframe", "expression", "gaps", "lookahead", "ignore_invalid_symbol", "currency"],
        "series <type>",
        "Requests data from another symbol or timeframe.",
    ),
    // strategy
    BuiltinFunctionSignature::new(
        "strategy.entry",
        &["id", "direction", "qty", "limit", "stop", "oca_name", "oca_type", "comment", "alert_message"],
        "void",
        "Enters a position.",
    ),
    BuiltinFunctionSignature::new(
        "strategy.exit",
        &[
            "id", "from_entry", "qty", "qty_percent", "profit", "limit", "loss", "stop", "trail_points",
            "trail_offset", "oca_name", "comment", "alert_message",
        ],
        "void",
        "Exits a position.",
    ),
    BuiltinFunctionSignature::new(
        "strategy.close",
        &["id", "comment", "qty", "qty_percent", "alert_message", "immediately"],
        "void",
        "Closes the position opened by an entry.",
    ),
    // input
    BuiltinFunctionSignature::new(
        "input",
        &["defval", "title", "tooltip", "inline", "group", "display"],
        "input int/float/bool/color/string",
        "Adds an input to the script settings.",
    ),
    BuiltinFunctionSignature::new(
        "input",
        &["defval", "title", "inline", "group", "tooltip", "display"],
        "series float",
        "Adds a source input to the script settings.",
    ),
    BuiltinFunctionSignature::new(
        "input.int",
        &["defval", "title", "minval", "maxval", "step", "tooltip", "inline", "group", "confirm"],
        "input int",
        "Integer input.",
    ),
    BuiltinFunctionSignature::new(
        "input.int",
        &["defval", "title", "options", "tooltip", "inline", "group", "confirm"],
        "input int",
        "Integer input chosen from a list.",
    ),
    BuiltinFunctionSignature::new(
        "input.float",
        &["defval", "title", "minval", "maxval", "step", "tooltip", "inline", "group", "confirm"],
        "input float",
        "Float input.",
    ),
    BuiltinFunctionSignature::new(
        "input.bool",
        &["defval", "title", "tooltip", "inline", "group", "confirm"],
        "input bool",
        "Checkbox input.",
    ),
    BuiltinFunctionSignature::new(
        "input.string",
        &["defval", "title", "options", "tooltip", "inline", "group", "confirm"],
        "input string",
        "String input.",
    ),
    BuiltinFunctionSignature::new(
        "input.source",
        &["defval", "title", "tooltip", "inline", "group"],
        "series float",
        "Price source input.",
    ),
    BuiltinFunctionSignature::new(
        "input.timeframe",
        &["defval", "title", "options", "tooltip", "inline", "group", "confirm"],
        "input string",
        "Timeframe input.",
    ),
    BuiltinFunctionSignature::new(
        "input.color",
        &["defval", "title", "tooltip", "inline", "group", "confirm"],
        "input color",
        "Color input.",
    ),
    // declarations
    BuiltinFunctionSignature::new(
        "indicator",
        &["title", "shorttitle", "overlay", "format", "precision", "scale", "max_bars_back", "timeframe"],
        "void",
        "Declares an indicator script.",
    ),
    BuiltinFunctionSignature::new(
        "strategy",
        &["title", "shorttitle", "overlay", "initial_capital", "default_qty_type", "default_qty_value", "pyramiding"],
        "void",
        "Declares a strategy script.",
    ),
    BuiltinFunctionSignature::new("library", &["title", "overlay"], "void", "Declares a library script."),
    // plotting
    BuiltinFunctionSignature::new(
        "plot",
        &[
            "series", "title", "color", "linewidth", "style", "trackprice", "histbase", "offset", "join",
            "editable", "show_last", "display",
        ],
        "plot",
        "Plots a series on the chart.",
    ),
    BuiltinFunctionSignature::new(
        "plotshape",
        &["series", "title", "style", "location", "color", "offset", "text", "textcolor", "size"],
        "void",
        "Plots a shape on bars where the series is true.",
    ),
    BuiltinFunctionSignature::new(
        "hline",
        &["price", "title", "color", "linestyle", "linewidth", "editable"],
        "hline",
        "Draws a horizontal line at a fixed price.",
    ),
    BuiltinFunctionSignature::new("bgcolor", &["color", "offset", "editable", "show_last", "title"], "void", "Fills the chart background."),
    BuiltinFunctionSignature::new(
        "fill",
        &["hline1", "hline2", "color", "title", "editable", "fillgaps"],
        "void",
        "Fills the area between two hlines.",
    ),
    BuiltinFunctionSignature::new(
        "fill",
        &["plot1", "plot2", "color", "title", "editable", "show_last", "fillgaps"],
        "void",
        "Fills the area between two plots.",
    ),
    BuiltinFunctionSignature::new("alertcondition", &["condition", "title", "message"], "void", "Creates an alert condition."),
    BuiltinFunctionSignature::new(
        "label.new",
        &["x", "y", "text", "xloc", "yloc", "color", "style", "textcolor", "size"],
        "series label",
        "Creates a label.",
    ),
    BuiltinFunctionSignature::new(
        "line.new",
        &["x1", "y1", "x2", "y2", "xloc", "extend", "color", "style", "width"],
        "series line",
        "Creates a line.",
    ),
    // misc
    BuiltinFunctionSignature::new("nz", &["source"], "series float", "Replaces na with zero."),
    BuiltinFunctionSignature::new("nz", &["source", "replacement"], "series float", "Replaces na with a value."),
    BuiltinFunctionSignature::new("na", &["x"], "series bool", "True if x is na."),
    BuiltinFunctionSignature::new(
        "time",
        &["timeframe", "session", "timezone"],
        "series int",
        "UNIX time of the bar's open.",
    ),
];

#[rustfmt::skip]
const MEMBERS: &[(&str, &[(&str, MemberKind)])] = &[
    (
        "ta",
        &[
            ("sma", F), ("ema", F), ("wma", F), ("rma", F), ("rsi", F), ("macd", F), ("atr", F),
            ("stdev", F), ("highest", F), ("lowest", F), ("crossover", F), ("crossunder", F),
            ("cross", F), ("change", F), ("bb", F), ("tr", V),
        ],
    ),
    (
        "math",
        &[
            ("abs", F), ("round", F), ("max", F), ("min", F), ("sqrt", F), ("pow", F), ("log", F),
            ("pi", C), ("e", C),
        ],
    ),
    ("str", &[("format", F), ("tostring", F), ("length", F), ("contains", F)]),
    (
        "color",
        &[
            ("rgb", F), ("new", F), ("red", C), ("green", C), ("blue", C), ("yellow", C),
            ("purple", C), ("orange", C), ("white", C), ("black", C), ("gray", C), ("silver", C),
            ("teal", C), ("navy", C), ("aqua", C), ("lime", C), ("maroon", C), ("olive", C),
            ("fuchsia", C),
        ],
    ),
    ("array", &[("new_float", F), ("push", F), ("get", F), ("size", F)]),
    ("request", &[("security", F)]),
    (
        "strategy",
        &[
            ("entry", F), ("exit", F), ("close", F), ("long", C), ("short", C),
            ("position_size", V), ("equity", V),
        ],
    ),
    (
        "input",
        &[
            ("int", F), ("float", F), ("bool", F), ("string", F), ("source", F), ("timeframe", F),
            ("color", F),
        ],
    ),
    (
        "syminfo",
        &[
            ("ticker", V), ("prefix", V), ("root", V), ("currency", V), ("description", V),
            ("timezone", V), ("session", V), ("mintick", V),
        ],
    ),
    (
        "barstate",
        &[
            ("isconfirmed", V), ("isfirst", V), ("islast", V), ("ishistory", V), ("isrealtime", V),
            ("isnew", V),
        ],
    ),
    ("timeframe", &[("period", V), ("isintraday", V), ("isdaily", V)]),
    ("label", &[("new", F)]),
    ("line", &[("new", F)]),
    (
        "shape",
        &[
            ("triangleup", C), ("triangledown", C), ("circle", C), ("cross", C), ("labelup", C),
            ("labeldown", C),
        ],
    ),
    ("location", &[("abovebar", C), ("belowbar", C), ("top", C), ("bottom", C), ("absolute", C)]),
    ("size", &[("tiny", C), ("small", C), ("normal", C), ("large", C), ("huge", C), ("auto", C)]),
];

static BUILTIN: Lazy<FunctionCatalog> = Lazy::new(|| FunctionCatalog::from_tables(SIGNATURES, MEMBERS));

/// Lookup structures over the built-in tables.
#[derive(Debug)]
pub struct FunctionCatalog {
    groups: Vec<OverloadGroup>,
    index: HashMap<&'static str, usize>,
    members: HashMap<&'static str, Vec<NamespaceMember>>,
}

impl FunctionCatalog {
    /// The process-wide built-in catalog.
    pub fn builtin() -> &'static FunctionCatalog {
        &BUILTIN
    }

    fn from_tables(
        signatures: &[BuiltinFunctionSignature],
        members: &[(&'static str, &[(&'static str, MemberKind)])],
    ) -> Self {
        let mut groups: Vec<OverloadGroup> = Vec::new();
        let mut index: HashMap<&'static str, usize> = HashMap::new();
        for signature in signatures {
            match index.get(signature.name) {
                Some(&i) => groups[i].overloads.push(*signature),
                None => {
                    index.insert(signature.name, groups.len());
                    groups.push(OverloadGroup {
                        name: signature.name,
                        overloads: vec![*signature],
                    });
                }
            }
        }

        let members = members
            .iter()
            .map(|&(namespace, entries)| {
                let entries = entries
                    .iter()
                    .map(|&(name, kind)| NamespaceMember {
                        namespace,
                        name,
                        kind,
                    })
                    .collect();
                (namespace, entries)
            })
            .collect();

        Self {
            groups,
            index,
            members,
        }
    }

    /// All overloads for an exact name, e.g. `ta.sma` or `input`.
    pub fn lookup(&self, name: &str) -> Option<&OverloadGroup> {
        self.index.get(name).map(|&i| &self.groups[i])
    }

    /// Every group in declaration order.
    pub fn groups(&self) -> &[OverloadGroup] {
        &self.groups
    }

    /// Every signature in declaration order, overloads adjacent.
    pub fn signatures(&self) -> impl Iterator<Item = &BuiltinFunctionSignature> {
        self.groups.iter().flat_map(|g| g.overloads.iter())
    }

    /// Members registered under a namespace; empty for unknown names.
    pub fn members(&self, namespace: &str) -> &[NamespaceMember] {
        self.members.get(namespace).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every member of a given kind, in table order.
    pub fn members_of_kind(&self, kind: MemberKind) -> impl Iterator<Item = NamespaceMember> + '_ {
        MEMBERS
            .iter()
            .flat_map(|&(namespace, _)| self.members(namespace).iter().copied())
            .filter(move |m| m.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let catalog = FunctionCatalog::builtin();
        let sma = catalog.lookup("ta.sma").unwrap();
        assert_eq!(sma.overloads.len(), 1);
        assert_eq!(sma.overloads[0].parameters, &["source", "length"]);
        assert_eq!(sma.overloads[0].parameter_list(), "(source, length)");
        assert!(catalog.lookup("sma").is_none());
    }

    #[test]
    fn test_overload_groups_keep_order() {
        let input = FunctionCatalog::builtin().lookup("input").unwrap();
        assert_eq!(input.overloads.len(), 2);
        assert_eq!(input.overloads[1].return_type, "series float");

        let round = FunctionCatalog::builtin().lookup("math.round").unwrap();
        assert_eq!(round.overloads[0].parameters.len(), 1);
        assert_eq!(round.overloads[1].parameters.len(), 2);
    }

    #[test]
    fn test_overloads_are_distinguishable() {
        for group in FunctionCatalog::builtin().groups() {
            let mut lists: Vec<_> = group.overloads.iter().map(|s| s.parameters).collect();
            lists.sort();
            lists.dedup();
            assert_eq!(lists.len(), group.overloads.len(), "{} has identical overloads", group.name);
        }
    }

    #[test]
    fn test_every_dotted_function_is_a_member() {
        let catalog = FunctionCatalog::builtin();
        for signature in catalog.signatures() {
            if let Some((namespace, member)) = signature.split_namespace() {
                let found = catalog
                    .members(namespace)
                    .iter()
                    .any(|m| m.name == member && m.kind == MemberKind::Function);
                assert!(found, "{} missing from member table", signature.name);
            }
        }
    }

    #[test]
    fn test_members() {
        let catalog = FunctionCatalog::builtin();
        let ta: Vec<_> = catalog.members("ta").iter().map(|m| m.name).collect();
        assert!(ta.contains(&"sma"));
        assert!(ta.contains(&"crossover"));
        assert!(catalog.members("nope").is_empty());

        let constants: Vec<_> = catalog
            .members_of_kind(MemberKind::Constant)
            .map(|m| m.qualified_name())
            .collect();
        assert!(constants.contains(&"color.red".to_string()));
        assert!(!constants.contains(&"ta.sma".to_string()));
    }
}
