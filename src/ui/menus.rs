use std::io::{BufRead, Write};

use crate::data::loader::Layout;

use super::prompt::{Console, PromptError};

// ---------------------------------------------------------------------------
// Numbered menus
// ---------------------------------------------------------------------------

/// A fixed numbered menu where `0` always means quit.
pub trait MenuItem: Copy + Sized + 'static {
    /// Heading printed above the list.
    const HEADING: &'static str;
    /// Prompt shown before each read.
    const PROMPT: &'static str;
    /// Every selectable item, in menu order.
    const ALL: &'static [Self];

    fn code(self) -> u32;
    fn label(self) -> &'static str;

    fn from_code(code: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|item| item.code() == code)
    }
}

/// Print the menu and read choices until one is valid.
/// Returns `None` when the user picks `0`.
pub fn choose<T: MenuItem, R: BufRead, W: Write>(
    console: &mut Console<R, W>,
) -> Result<Option<T>, PromptError> {
    console.say(T::HEADING)?;
    console.say("0 : TO QUIT")?;
    for item in T::ALL {
        console.say(format_args!("{} : {}", item.code(), item.label()))?;
    }

    let choice = console.ask_with(T::PROMPT, |s| {
        let code: u32 = s
            .parse()
            .map_err(|_| PromptError::bad_input(format!("'{s}' is not a menu number.")))?;
        if code == 0 {
            return Ok(None);
        }
        T::from_code(code).map(Some).ok_or(PromptError::InvalidSelection)
    })?;

    if let Some(item) = choice {
        console.say(format_args!("\nYou have chosen {}", item.label()))?;
    }
    Ok(choice)
}

// ---------------------------------------------------------------------------
// DAQ source menu
// ---------------------------------------------------------------------------

/// Which instrument and export flavour produced the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaqSource {
    AgilentRaw,
    AgilentProcessed,
    HbmRaw,
    HbmProcessed,
}

impl DaqSource {
    /// Raw exports need naming and are saved as a cleaned CSV; processed
    /// exports are already clean.
    pub fn is_raw(self) -> bool {
        matches!(self, DaqSource::AgilentRaw | DaqSource::HbmRaw)
    }

    /// The loader layout for this source. Only the Agilent raw layout
    /// depends on the sensor count.
    pub fn layout(self, sensors: usize) -> Layout {
        match self {
            DaqSource::AgilentRaw => Layout::AgilentRaw { sensors },
            DaqSource::AgilentProcessed => Layout::AgilentProcessed,
            DaqSource::HbmRaw => Layout::HbmRaw,
            DaqSource::HbmProcessed => Layout::HbmProcessed,
        }
    }
}

impl MenuItem for DaqSource {
    const HEADING: &'static str = "Data Acquisition Units:";
    const PROMPT: &'static str = "\nSelect a data acquisition unit: ";
    const ALL: &'static [Self] = &[
        DaqSource::AgilentRaw,
        DaqSource::AgilentProcessed,
        DaqSource::HbmRaw,
        DaqSource::HbmProcessed,
    ];

    fn code(self) -> u32 {
        match self {
            DaqSource::AgilentRaw => 1,
            DaqSource::AgilentProcessed => 2,
            DaqSource::HbmRaw => 3,
            DaqSource::HbmProcessed => 4,
        }
    }

    fn label(self) -> &'static str {
        match self {
            DaqSource::AgilentRaw => "Agilent 34972A \"Raw Data\"",
            DaqSource::AgilentProcessed => "Agilent 34972A \"Processed\"",
            DaqSource::HbmRaw => "HBM MX403B \"Raw Data\"",
            DaqSource::HbmProcessed => "HBM MX403B \"Processed\"",
        }
    }
}

// ---------------------------------------------------------------------------
// Graph template menu
// ---------------------------------------------------------------------------

/// The predefined plot templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphKind {
    Temperature,
    Pressure,
    Current,
    Custom,
}

impl MenuItem for GraphKind {
    const HEADING: &'static str = "Graph List:";
    const PROMPT: &'static str = "\nSelect a graph type: ";
    const ALL: &'static [Self] = &[
        GraphKind::Temperature,
        GraphKind::Pressure,
        GraphKind::Current,
        GraphKind::Custom,
    ];

    fn code(self) -> u32 {
        match self {
            GraphKind::Temperature => 1,
            GraphKind::Pressure => 2,
            GraphKind::Current => 3,
            GraphKind::Custom => 4,
        }
    }

    fn label(self) -> &'static str {
        match self {
            GraphKind::Temperature => "Temperature Graph",
            GraphKind::Pressure => "Pressure Graph",
            GraphKind::Current => "Current",
            GraphKind::Custom => "Custom Graph",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn every_code_maps_to_its_own_source() {
        for (code, expected) in [
            (1, DaqSource::AgilentRaw),
            (2, DaqSource::AgilentProcessed),
            (3, DaqSource::HbmRaw),
            (4, DaqSource::HbmProcessed),
        ] {
            assert_eq!(DaqSource::from_code(code), Some(expected));
        }
        assert_eq!(DaqSource::from_code(5), None);
    }

    #[test]
    fn invalid_choices_are_asked_again() {
        let mut c = console("7\nx\n3\n");
        let pick: Option<DaqSource> = choose(&mut c).unwrap();
        assert_eq!(pick, Some(DaqSource::HbmRaw));

        let out = String::from_utf8(c.into_output()).unwrap();
        assert!(out.contains("0 : TO QUIT"));
        assert!(out.contains("4 : HBM MX403B \"Processed\""));
        assert!(out.contains("Your choice is not available."));
        assert!(out.contains("'x' is not a menu number."));
        assert!(out.contains("You have chosen HBM MX403B \"Raw Data\""));
    }

    #[test]
    fn zero_quits() {
        let mut c = console("0\n");
        let pick: Option<GraphKind> = choose(&mut c).unwrap();
        assert_eq!(pick, None);
    }

    #[test]
    fn raw_sources_map_to_raw_layouts() {
        assert_eq!(
            DaqSource::AgilentRaw.layout(3),
            Layout::AgilentRaw { sensors: 3 }
        );
        assert_eq!(DaqSource::HbmProcessed.layout(3), Layout::HbmProcessed);
        assert!(DaqSource::HbmRaw.is_raw());
        assert!(!DaqSource::AgilentProcessed.is_raw());
    }
}
