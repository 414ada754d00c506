use core::fmt;

/// One bit field of a Snowflake layout, as rendered by
/// [`write_bit_layout_debug`].
pub struct FieldLayout {
    pub name: &'static str,
    pub bits: u8,
    pub value: u64,
}

/// Describes an ID's fields for human-readable `Debug` output.
pub trait SnowflakeBitLayout {
    fn id(&self) -> u64;
    fn fields(&self) -> Vec<FieldLayout>;
    fn to_padded_string(&self) -> String;
}

fn center(s: &str, width: usize) -> String {
    let len = s.len();
    if len >= width {
        return s.to_owned();
    }
    let pad = width - len;
    let left = pad / 2;
    let right = pad - left;
    format!("{}{}{}", " ".repeat(left), s, " ".repeat(right))
}

fn write_border(f: &mut fmt::Formatter<'_>, columns: &[usize]) -> fmt::Result {
    write!(f, "        +")?;
    for &w in columns {
        write!(f, "{}+", "-".repeat(w))?;
    }
    writeln!(f)
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[String], columns: &[usize]) -> fmt::Result {
    write!(f, "        |")?;
    for (cell, &w) in cells.iter().zip(columns) {
        write!(f, "{}|", center(cell, w))?;
    }
    writeln!(f)
}

/// Writes a table with one column per field: label, decimal and hex value.
///
/// ```text
/// MessengerId {
///     raw id     : 0x0000000000201003 (2101251)
///     padded     : 0000000000002101251
///     layout     :
///         +--------------+----------------+---------------+---------------+
///         | reserved (1) | timestamp (42) | worker_id (10)| sequence (11) |
///         ...
/// }
/// ```
pub fn write_bit_layout_debug(
    f: &mut fmt::Formatter<'_>,
    id_type: &impl SnowflakeBitLayout,
    type_name: &str,
) -> fmt::Result {
    let fields: Vec<_> = id_type
        .fields()
        .into_iter()
        .filter(|field| field.bits > 0)
        .collect();

    let labels: Vec<String> = fields
        .iter()
        .map(|field| format!("{} ({})", field.name, field.bits))
        .collect();
    let decimals: Vec<String> = fields.iter().map(|field| field.value.to_string()).collect();
    let hexes: Vec<String> = fields
        .iter()
        .map(|field| format!("0x{:x}", field.value))
        .collect();

    // +2 for padding
    let columns: Vec<usize> = (0..fields.len())
        .map(|i| labels[i].len().max(decimals[i].len()).max(hexes[i].len()) + 2)
        .collect();

    writeln!(f, "{type_name} {{")?;
    writeln!(
        f,
        "    raw id     : 0x{:016x} ({})",
        id_type.id(),
        id_type.id()
    )?;
    writeln!(f, "    padded     : {}", id_type.to_padded_string())?;
    writeln!(f, "    layout     :")?;

    write_border(f, &columns)?;
    write_row(f, &labels, &columns)?;
    write_border(f, &columns)?;
    write_row(f, &decimals, &columns)?;
    write_row(f, &hexes, &columns)?;
    write_border(f, &columns)?;

    write!(f, "}}")
}
