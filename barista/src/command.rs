use std::{fmt::Display, str::FromStr};

use anyhow::{anyhow, bail, Result};

trait MySplit<'a> {
    fn my_split<'b>(&'a self, p: &'b str) -> (Option<&'a str>, Option<&'a str>);
}

impl<'a> MySplit<'a> for &'a str {
    fn my_split<'b>(&'a self, p: &'b str) -> (Option<&'a str>, Option<&'a str>) {
        let mut iter = self.splitn(2, p);
        (iter.next(), iter.next())
    }
}

/// One user action on the Mini App, typed as a line of text.
///
/// Grammar: `verb [argument][: text]`. Positions (`pick`, `remove`) are
/// 1-based as shown on screen. For `category`, `open`, `size` and `time` the
/// whole rest of the line is the argument, ':' included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Category(String),
    Open(String),
    Size(String),
    Cinnamon,
    Syrup,
    MintLemon,
    Pick(usize),
    Close,
    Comment(String),
    Add,
    Cart,
    Remove(usize),
    Time(String),
    Note(String),
    Checkout,
    Back,
    Retry,
    Quit,
}

fn parse_position(verb: &str, arg: Option<&str>) -> Result<usize> {
    let arg = arg.ok_or(anyhow!("{} needs a number", verb))?;
    let position: usize = arg
        .parse()
        .map_err(|_| anyhow!("error parsing number {}", arg))?;
    if position == 0 {
        bail!("{} counts from 1", verb);
    }
    Ok(position)
}

impl Command {
    pub fn from_command_string(input: &str) -> Result<Self> {
        use Command::*;
        // Input: verb argument: text
        let input = input.trim();
        if input.is_empty() {
            bail!("Command must not be an empty string.");
        }
        let verb_end = input
            .find(|c: char| c.is_whitespace() || c == ':')
            .unwrap_or(input.len());
        let (verb, rest) = input.split_at(verb_end);
        // Catalog names and times may carry their own ':'
        let (arg, text) = match verb {
            "category" | "open" | "size" | "time" => (Some(rest), None),
            _ => rest.my_split(":"),
        };
        let arg = arg.map(|a| a.trim()).filter(|a| !a.is_empty());
        let text = text.map(|t| t.trim().to_string());

        let needs_arg = |what: &str| -> Result<String> {
            arg.map(String::from)
                .ok_or(anyhow!("{} command needs {}", verb, what))
        };
        let command = match verb {
            "category" => Category(needs_arg("a category name")?),
            "open" => Open(needs_arg("an item name")?),
            "size" => Size(needs_arg("a size")?),
            "cinnamon" => Cinnamon,
            "syrup" => Syrup,
            "mint" => MintLemon,
            "pick" => Pick(parse_position(verb, arg)?),
            "close" => Close,
            "comment" => Comment(text.clone().unwrap_or_default()),
            "add" => Add,
            "cart" => Cart,
            "remove" => Remove(parse_position(verb, arg)?),
            "time" => Time(needs_arg("a time")?),
            "note" => Note(text.clone().unwrap_or_default()),
            "checkout" => Checkout,
            "back" => Back,
            "retry" => Retry,
            "quit" => Quit,
            c => bail!("Unknown command: {}", c),
        };
        command.integrity_check(arg.is_some(), text.is_some())?;
        Ok(command)
    }

    fn integrity_check(&self, has_arg: bool, has_text: bool) -> Result<()> {
        use Command::*;
        match self {
            Comment(_) | Note(_) => {
                if has_arg {
                    bail!("{} takes its text after ':'", self.verb());
                }
                if !has_text {
                    bail!("{} needs ':' before the text", self.verb());
                }
            }
            Category(_) | Open(_) | Size(_) | Pick(_) | Remove(_) | Time(_) => {
                if has_text {
                    bail!("{} doesn't take text after ':'", self.verb());
                }
            }
            _ => {
                if has_arg || has_text {
                    bail!("{} needs nothing. Just only {}.", self.verb(), self.verb());
                }
            }
        }
        Ok(())
    }

    pub fn verb(&self) -> &'static str {
        use Command::*;
        match self {
            Category(_) => "category",
            Open(_) => "open",
            Size(_) => "size",
            Cinnamon => "cinnamon",
            Syrup => "syrup",
            MintLemon => "mint",
            Pick(_) => "pick",
            Close => "close",
            Comment(_) => "comment",
            Add => "add",
            Cart => "cart",
            Remove(_) => "remove",
            Time(_) => "time",
            Note(_) => "note",
            Checkout => "checkout",
            Back => "back",
            Retry => "retry",
            Quit => "quit",
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Command::*;
        match self {
            Category(s) | Open(s) | Size(s) | Time(s) => write!(f, "{} {}", self.verb(), s),
            Pick(n) | Remove(n) => write!(f, "{} {}", self.verb(), n),
            Comment(s) | Note(s) => write!(f, "{}: {}", self.verb(), s),
            _ => write!(f, "{}", self.verb()),
        }
    }
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::from_command_string(s)
    }
}

/// Help text listing every command.
pub const USAGE: &str = "\
category <name>   switch category
open <item>       configure an item
size <label>      pick a size
cinnamon          toggle cinnamon
syrup | mint      choose a syrup / mint and lemon
pick <n>          take line n from the open list
close             close the list
comment: <text>   comment for the item
add               add the item to the cart
cart              show the cart
remove <n>        remove line n from the cart
time <HH:MM>      delivery time
note: <text>      comment for the order
checkout          send the order
back              back to the menu
retry             reload after an error
quit

category, open, size and time take the rest of the line as is,
so names containing ':' work: open Раф: ванильный";

#[cfg(test)]
mod tests {
    use super::Command::*;
    use super::*;

    #[test]
    fn test_bad_string() {
        assert!(Command::from_command_string("").is_err());
        assert!(Command::from_command_string("   ").is_err());
        assert!(Command::from_command_string("brew me something").is_err());
        assert!(Command::from_command_string("open").is_err());
        assert!(Command::from_command_string("size").is_err());
        assert!(Command::from_command_string("pick zero").is_err());
        assert!(Command::from_command_string("pick 0").is_err());
        assert!(Command::from_command_string("remove").is_err());
    }

    #[test]
    fn test_command_tokens() {
        assert_eq!(
            Command::from_command_string("category Кофе").unwrap(),
            Category("Кофе".into())
        );
        assert_eq!(
            Command::from_command_string("  open   Раф на кокосовом  ").unwrap(),
            Open("Раф на кокосовом".into())
        );
        assert_eq!(Command::from_command_string("size M").unwrap(), Size("M".into()));
        assert_eq!(Command::from_command_string("cinnamon").unwrap(), Cinnamon);
        assert_eq!(Command::from_command_string("mint").unwrap(), MintLemon);
        assert_eq!(Command::from_command_string("pick 3").unwrap(), Pick(3));
        assert_eq!(Command::from_command_string("remove 1").unwrap(), Remove(1));
        assert_eq!(
            Command::from_command_string("time 10:45").unwrap(),
            Time("10:45".into())
        );
        assert_eq!(Command::from_command_string("checkout").unwrap(), Checkout);
    }

    #[test]
    fn test_text_payloads() {
        assert_eq!(
            Command::from_command_string("comment: без сахара").unwrap(),
            Comment("без сахара".into())
        );
        assert_eq!(
            Command::from_command_string("note:  позвоните: домофон  ").unwrap(),
            Note("позвоните: домофон".into())
        );
        assert_eq!(
            Command::from_command_string("comment:").unwrap(),
            Comment("".into())
        );
    }

    #[test]
    fn test_colon_inside_argument() {
        assert_eq!(
            Command::from_command_string("time 10:45").unwrap(),
            Time("10:45".into())
        );
        assert_eq!(
            Command::from_command_string("open Раф: ванильный").unwrap(),
            Open("Раф: ванильный".into())
        );
        assert_eq!(
            Command::from_command_string("category Сезонное: осень").unwrap(),
            Category("Сезонное: осень".into())
        );
        assert_eq!(
            Command::from_command_string("size 0,3: стакан").unwrap(),
            Size("0,3: стакан".into())
        );
        assert_eq!(
            Command::from_command_string("open Раф: ванильный")
                .unwrap()
                .to_string(),
            "open Раф: ванильный"
        );
    }

    #[test]
    fn test_integrity_check() {
        assert!(Command::from_command_string("comment без двоеточия").is_err());
        assert!(Command::from_command_string("comment").is_err());
        assert!(Command::from_command_string("checkout now").is_err());
        assert!(Command::from_command_string("add: extra").is_err());
        assert!(Command::from_command_string("pick 2: hot").is_err());
        assert!(Command::from_command_string("remove 1: all").is_err());
    }

    #[test]
    fn test_display() {
        for s in [
            "category Кофе",
            "open Латте",
            "pick 2",
            "comment: без сахара",
            "time 10:45",
            "quit",
        ] {
            assert_eq!(Command::from_command_string(s).unwrap().to_string(), s);
        }
    }
}
