//! Body template engine.
//!
//! Page bodies use the `{{ ... }}` action syntax:
//!
//! - `{{.Name}}`, `{{.Locked}}` and `{{.}}` print values;
//! - `{{if P}} ... {{else if P}} ... {{else}} ... {{end}}` select text;
//! - `not`, `and`, `or`, `eq` and `ne` combine values, with parentheses and
//!   `|` pipes;
//! - `{{/* ... */}}` is a comment, and `{{- ` / ` -}}` trim the adjacent
//!   whitespace.
//!
//! The whole template is parsed before anything is executed, and execution
//! either produces the complete output or an error.

use std::fmt::Write as _;

use crate::error::TemplateError;

use super::RenderContext;

/// Fields exposed to templates.
const FIELDS: [&str; 2] = ["Name", "Locked"];

/// Deepest nesting of `if` blocks, and separately of parentheses, a
/// template may use.
pub const MAX_DEPTH: usize = 100;

/// Actions the language deliberately does not support.
const UNSUPPORTED: [&str; 7] = [
    "range", "with", "define", "template", "block", "break", "continue",
];

/// Parses and executes `source` against `ctx`.
///
/// # Errors
///
/// Returns a [`TemplateError`] for syntax errors and for execution failures
/// such as references to unknown fields.
pub fn execute(source: &str, ctx: &RenderContext) -> Result<String, TemplateError> {
    let template = Template::parse(source)?;
    template.execute(ctx)
}

/// A parsed body template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Parses a template source.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] naming the line of the first syntax error.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let items = scan(source)?;
        let mut parser = Parser {
            items,
            pos: 0,
            depth: 0,
        };
        let (nodes, end) = parser.parse_list()?;
        match end {
            End::Eof => Ok(Self { nodes }),
            End::End { line } => Err(TemplateError::new(line, "unexpected {{end}}")),
            End::Else { line, .. } => Err(TemplateError::new(line, "unexpected {{else}}")),
        }
    }

    /// Executes the template against a render context.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] if any action fails to evaluate. No
    /// partial output is returned.
    pub fn execute(&self, ctx: &RenderContext) -> Result<String, TemplateError> {
        let mut out = String::new();
        write_nodes(&self.nodes, ctx, &mut out)?;
        Ok(out)
    }
}

// ============================================================================
// Syntax tree
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Print(Pipeline),
    If {
        branches: Vec<(Pipeline, Vec<Node>)>,
        otherwise: Vec<Node>,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct Pipeline {
    line: usize,
    commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Call { func: Func, args: Vec<Operand> },
    Operand(Operand),
}

#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Dot,
    Field(Vec<String>),
    Literal(Value),
    Pipeline(Box<Pipeline>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Func {
    Not,
    And,
    Or,
    Eq,
    Ne,
}

impl Func {
    fn lookup(name: &str) -> Option<Self> {
        match name {
            "not" => Some(Self::Not),
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Not => "not",
            Self::And => "and",
            Self::Or => "or",
            Self::Eq => "eq",
            Self::Ne => "ne",
        }
    }
}

/// A runtime value.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Str(String),
    Bool(bool),
    Context { name: String, locked: bool },
}

impl Value {
    const fn truth(&self) -> bool {
        match self {
            Self::Str(s) => !s.is_empty(),
            Self::Bool(b) => *b,
            Self::Context { .. } => true,
        }
    }

    const fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Bool(_) => "bool",
            Self::Context { .. } => "page context",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Context { name, locked } => write!(f, "{{{name} {locked}}}"),
        }
    }
}

// ============================================================================
// Scanner
// ============================================================================

#[derive(Debug)]
enum Item {
    Text(String),
    Action { line: usize, tokens: Vec<Token> },
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Dot,
    Field(Vec<String>),
    Ident(String),
    Str(String),
    Bool(bool),
    LParen,
    RParen,
    Pipe,
}

const fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Splits the source into text runs and tokenized actions, applying trim
/// markers and dropping comments.
fn scan(source: &str) -> Result<Vec<Item>, TemplateError> {
    let mut items = Vec::new();
    let mut pos = 0;
    let mut trim_next = false;
    let mut line = 1;

    while let Some(rel) = source[pos..].find("{{") {
        let open = pos + rel;
        line += source[pos..open].matches('\n').count();
        let action_line = line;
        let mut text = &source[pos..open];
        if trim_next {
            text = text.trim_start_matches(is_space);
        }

        let mut inner_start = open + 2;
        let after_open = &source[inner_start..];
        let trim_left = after_open.starts_with('-') && after_open[1..].starts_with(is_space);
        if trim_left {
            text = text.trim_end_matches(is_space);
            inner_start += 1;
        }
        if !text.is_empty() {
            items.push(Item::Text(text.to_string()));
        }

        let close = find_action_end(source, inner_start, action_line)?;
        line += source[open..close].matches('\n').count();
        pos = close + 2;

        let mut inner = &source[inner_start..close];
        trim_next = inner.ends_with('-') && inner[..inner.len() - 1].ends_with(is_space);
        if trim_next {
            inner = &inner[..inner.len() - 1];
        }

        let body = inner.trim_matches(is_space);
        if body.starts_with("/*") {
            if !body.ends_with("*/") || body.len() < 4 {
                return Err(TemplateError::new(
                    action_line,
                    "comment ends before closing delimiter",
                ));
            }
            continue;
        }

        let tokens = tokenize(inner, action_line)?;
        items.push(Item::Action {
            line: action_line,
            tokens,
        });
    }

    let mut text = &source[pos..];
    if trim_next {
        text = text.trim_start_matches(is_space);
    }
    if !text.is_empty() {
        items.push(Item::Text(text.to_string()));
    }

    Ok(items)
}

/// Finds the byte offset of the `}}` closing the action starting at `start`,
/// skipping over quoted strings and comments.
fn find_action_end(source: &str, start: usize, line: usize) -> Result<usize, TemplateError> {
    let bytes = source.as_bytes();
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'}' if bytes.get(i + 1) == Some(&b'}') => return Ok(i),
            b'"' => {
                i += 1;
                loop {
                    match bytes.get(i) {
                        None | Some(b'\n') => {
                            return Err(TemplateError::new(line, "unterminated quoted string"));
                        }
                        Some(b'\\') => i += 2,
                        Some(b'"') => break,
                        Some(_) => i += 1,
                    }
                }
            }
            b'`' => {
                i += 1;
                while bytes.get(i).is_some_and(|&b| b != b'`') {
                    i += 1;
                }
                if i >= bytes.len() {
                    return Err(TemplateError::new(line, "unterminated raw quoted string"));
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => match source[i + 2..].find("*/") {
                Some(rel) => i = i + 2 + rel + 1,
                None => return Err(TemplateError::new(line, "unclosed comment")),
            },
            _ => {}
        }
        i += 1;
    }
    Err(TemplateError::new(line, "unclosed action"))
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn tokenize(inner: &str, line: usize) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();
    let mut chars = inner.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if is_space(c) => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '|' => {
                chars.next();
                tokens.push(Token::Pipe);
            }
            '.' => {
                let mut path = Vec::new();
                while chars.peek().is_some_and(|&(_, c)| c == '.') {
                    chars.next();
                    let mut ident = String::new();
                    while let Some(&(_, c)) = chars.peek() {
                        if (ident.is_empty() && !is_ident_start(c)) || !is_ident_char(c) {
                            break;
                        }
                        ident.push(c);
                        chars.next();
                    }
                    if ident.is_empty() {
                        if path.is_empty() {
                            break;
                        }
                        return Err(TemplateError::new(line, format!("bad field reference in {inner:?}")));
                    }
                    path.push(ident);
                }
                if path.is_empty() {
                    tokens.push(Token::Dot);
                } else {
                    tokens.push(Token::Field(path));
                }
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        None => return Err(TemplateError::new(line, "unterminated quoted string")),
                        Some((_, '"')) => break,
                        Some((_, '\\')) => match chars.next() {
                            Some((_, 'n')) => value.push('\n'),
                            Some((_, 't')) => value.push('\t'),
                            Some((_, 'r')) => value.push('\r'),
                            Some((_, '\\')) => value.push('\\'),
                            Some((_, '"')) => value.push('"'),
                            Some((_, other)) => {
                                return Err(TemplateError::new(
                                    line,
                                    format!("invalid escape sequence \\{other} in quoted string"),
                                ));
                            }
                            None => {
                                return Err(TemplateError::new(line, "unterminated quoted string"));
                            }
                        },
                        Some((_, c)) => value.push(c),
                    }
                }
                tokens.push(Token::Str(value));
            }
            '`' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        None => {
                            return Err(TemplateError::new(line, "unterminated raw quoted string"));
                        }
                        Some((_, '`')) => break,
                        Some((_, c)) => value.push(c),
                    }
                }
                tokens.push(Token::Str(value));
            }
            c if is_ident_start(c) => {
                let mut ident = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if !is_ident_char(c) {
                        break;
                    }
                    ident.push(c);
                    chars.next();
                }
                match ident.as_str() {
                    "true" => tokens.push(Token::Bool(true)),
                    "false" => tokens.push(Token::Bool(false)),
                    "nil" => return Err(TemplateError::new(line, "nil is not a command")),
                    _ => tokens.push(Token::Ident(ident)),
                }
            }
            '$' => return Err(TemplateError::new(line, "variables are not supported")),
            c if c.is_ascii_digit() || c == '-' || c == '+' => {
                return Err(TemplateError::new(
                    line,
                    format!("numbers are not supported: {:?}", &inner[start..]),
                ));
            }
            other => {
                return Err(TemplateError::new(
                    line,
                    format!("unexpected {other:?} in command"),
                ));
            }
        }
    }

    Ok(tokens)
}

// ============================================================================
// Parser
// ============================================================================

/// How a list of nodes ended.
enum End {
    Eof,
    End { line: usize },
    Else { line: usize, cond: Option<Pipeline> },
}

struct Parser {
    items: Vec<Item>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn parse_list(&mut self) -> Result<(Vec<Node>, End), TemplateError> {
        let mut nodes = Vec::new();

        while self.pos < self.items.len() {
            let item = std::mem::replace(&mut self.items[self.pos], Item::Text(String::new()));
            self.pos += 1;

            let (line, tokens) = match item {
                Item::Text(text) => {
                    nodes.push(Node::Text(text));
                    continue;
                }
                Item::Action { line, tokens } => (line, tokens),
            };

            match tokens.first() {
                Some(Token::Ident(kw)) if kw == "end" => {
                    if tokens.len() > 1 {
                        return Err(TemplateError::new(line, "unexpected arguments in end"));
                    }
                    return Ok((nodes, End::End { line }));
                }
                Some(Token::Ident(kw)) if kw == "else" => {
                    let cond = match tokens.get(1) {
                        None => None,
                        Some(Token::Ident(kw)) if kw == "if" => {
                            Some(parse_pipeline_tokens(&tokens[2..], line, "if")?)
                        }
                        Some(_) => {
                            return Err(TemplateError::new(line, "unexpected arguments in else"));
                        }
                    };
                    return Ok((nodes, End::Else { line, cond }));
                }
                Some(Token::Ident(kw)) if kw == "if" => {
                    let cond = parse_pipeline_tokens(&tokens[1..], line, "if")?;
                    if self.depth >= MAX_DEPTH {
                        return Err(depth_exceeded(line));
                    }
                    self.depth += 1;
                    let node = self.parse_if(cond, line)?;
                    self.depth -= 1;
                    nodes.push(node);
                }
                Some(Token::Ident(kw)) if UNSUPPORTED.contains(&kw.as_str()) => {
                    return Err(TemplateError::new(
                        line,
                        format!("{{{{{kw}}}}} is not supported in page content"),
                    ));
                }
                _ => nodes.push(Node::Print(parse_pipeline_tokens(&tokens, line, "command")?)),
            }
        }

        Ok((nodes, End::Eof))
    }

    fn parse_if(&mut self, cond: Pipeline, line: usize) -> Result<Node, TemplateError> {
        let mut branches = Vec::new();
        let mut cond = cond;

        loop {
            let (body, end) = self.parse_list()?;
            branches.push((cond, body));
            match end {
                End::End { .. } => {
                    return Ok(Node::If {
                        branches,
                        otherwise: Vec::new(),
                    });
                }
                End::Else {
                    cond: Some(next), ..
                } => cond = next,
                End::Else { cond: None, .. } => {
                    let (otherwise, end) = self.parse_list()?;
                    return match end {
                        End::End { .. } => Ok(Node::If {
                            branches,
                            otherwise,
                        }),
                        End::Else { line, .. } => {
                            Err(TemplateError::new(line, "expected end; found {{else}}"))
                        }
                        End::Eof => Err(TemplateError::new(line, "unexpected EOF in if")),
                    };
                }
                End::Eof => return Err(TemplateError::new(line, "unexpected EOF in if")),
            }
        }
    }
}

fn parse_pipeline_tokens(
    tokens: &[Token],
    line: usize,
    context: &str,
) -> Result<Pipeline, TemplateError> {
    if tokens.is_empty() {
        return Err(TemplateError::new(line, format!("missing value for {context}")));
    }
    let mut pos = 0;
    let pipeline = parse_pipeline(tokens, &mut pos, line, 0)?;
    match tokens.get(pos) {
        None => Ok(pipeline),
        Some(Token::RParen) => Err(TemplateError::new(line, "unexpected right paren")),
        Some(other) => Err(TemplateError::new(line, format!("unexpected {other:?} in {context}"))),
    }
}

/// Parses commands separated by `|`, stopping before `)` or end of tokens.
/// `depth` is the number of enclosing parentheses.
fn parse_pipeline(
    tokens: &[Token],
    pos: &mut usize,
    line: usize,
    depth: usize,
) -> Result<Pipeline, TemplateError> {
    let mut commands = Vec::new();

    loop {
        let mut operands = Vec::new();
        let mut func = None;

        while let Some(token) = tokens.get(*pos) {
            match token {
                Token::Pipe | Token::RParen => break,
                Token::Ident(name) => {
                    let Some(f) = Func::lookup(name) else {
                        return Err(TemplateError::new(
                            line,
                            format!("function {name:?} not defined"),
                        ));
                    };
                    if func.is_some() || !operands.is_empty() {
                        return Err(TemplateError::new(
                            line,
                            format!("function {name:?} used as an argument"),
                        ));
                    }
                    func = Some(f);
                }
                Token::Dot => operands.push(Operand::Dot),
                Token::Field(path) => operands.push(Operand::Field(path.clone())),
                Token::Str(s) => operands.push(Operand::Literal(Value::Str(s.clone()))),
                Token::Bool(b) => operands.push(Operand::Literal(Value::Bool(*b))),
                Token::LParen => {
                    if depth >= MAX_DEPTH {
                        return Err(depth_exceeded(line));
                    }
                    *pos += 1;
                    let inner = parse_pipeline(tokens, pos, line, depth + 1)?;
                    if tokens.get(*pos) != Some(&Token::RParen) {
                        return Err(TemplateError::new(line, "unclosed left paren"));
                    }
                    operands.push(Operand::Pipeline(Box::new(inner)));
                }
            }
            *pos += 1;
        }

        let command = match func {
            Some(func) => Command::Call {
                func,
                args: operands,
            },
            None => {
                if !commands.is_empty() {
                    return Err(TemplateError::new(
                        line,
                        "cannot pipe a value into a non-function",
                    ));
                }
                let mut operands = operands.into_iter();
                match (operands.next(), operands.next()) {
                    (Some(operand), None) => Command::Operand(operand),
                    (None, _) => return Err(TemplateError::new(line, "missing value for command")),
                    (Some(_), Some(_)) => {
                        return Err(TemplateError::new(
                            line,
                            "cannot give arguments to a non-function",
                        ));
                    }
                }
            }
        };
        commands.push(command);

        if tokens.get(*pos) == Some(&Token::Pipe) {
            *pos += 1;
        } else {
            return Ok(Pipeline { line, commands });
        }
    }
}

fn depth_exceeded(line: usize) -> TemplateError {
    TemplateError::new(line, "exceeded maximum template depth")
}

// ============================================================================
// Execution
// ============================================================================

fn write_nodes(nodes: &[Node], ctx: &RenderContext, out: &mut String) -> Result<(), TemplateError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Print(pipeline) => {
                let value = eval_pipeline(pipeline, ctx)?;
                let _ = write!(out, "{value}");
            }
            Node::If {
                branches,
                otherwise,
            } => {
                let mut taken = None;
                for (cond, body) in branches {
                    if eval_pipeline(cond, ctx)?.truth() {
                        taken = Some(body);
                        break;
                    }
                }
                write_nodes(taken.unwrap_or(otherwise), ctx, out)?;
            }
        }
    }
    Ok(())
}

fn eval_pipeline(pipeline: &Pipeline, ctx: &RenderContext) -> Result<Value, TemplateError> {
    let mut piped: Option<Value> = None;
    for command in &pipeline.commands {
        let value = match command {
            Command::Operand(operand) => eval_operand(operand, ctx, pipeline.line)?,
            Command::Call { func, args } => call(*func, args, piped.take(), ctx, pipeline.line)?,
        };
        piped = Some(value);
    }
    piped.ok_or_else(|| TemplateError::new(pipeline.line, "empty pipeline"))
}

fn eval_operand(operand: &Operand, ctx: &RenderContext, line: usize) -> Result<Value, TemplateError> {
    match operand {
        Operand::Dot => Ok(Value::Context {
            name: ctx.name.clone(),
            locked: ctx.locked,
        }),
        Operand::Literal(value) => Ok(value.clone()),
        Operand::Pipeline(pipeline) => eval_pipeline(pipeline, ctx),
        Operand::Field(path) => eval_field(path, ctx, line),
    }
}

fn eval_field(path: &[String], ctx: &RenderContext, line: usize) -> Result<Value, TemplateError> {
    let reference = format!(".{}", path.join("."));
    let mut segments = path.iter();
    let value = match segments.next().map(String::as_str) {
        Some("Name") => Value::Str(ctx.name.clone()),
        Some("Locked") => Value::Bool(ctx.locked),
        Some(unknown) => {
            let mut message =
                format!("executing at <{reference}>: can't evaluate field {unknown}");
            if let Some(suggestion) = suggest_field(unknown) {
                let _ = write!(message, " (did you mean .{suggestion}?)");
            }
            return Err(TemplateError::new(line, message));
        }
        None => return Err(TemplateError::new(line, "empty field reference")),
    };

    if let Some(next) = segments.next() {
        let message = format!(
            "executing at <{reference}>: can't evaluate field {next} in type {}",
            value.type_name()
        );
        return Err(TemplateError::new(line, message));
    }

    Ok(value)
}

/// Suggests the closest known field for a mistyped reference.
fn suggest_field(input: &str) -> Option<&'static str> {
    FIELDS
        .iter()
        .map(|f| (*f, strsim::damerau_levenshtein(&input.to_lowercase(), &f.to_lowercase())))
        .filter(|(_, dist)| *dist <= 2)
        .min_by_key(|(_, dist)| *dist)
        .map(|(name, _)| name)
}

fn call(
    func: Func,
    args: &[Operand],
    piped: Option<Value>,
    ctx: &RenderContext,
    line: usize,
) -> Result<Value, TemplateError> {
    let arity = args.len() + usize::from(piped.is_some());
    let mut values = args
        .iter()
        .map(|arg| eval_operand(arg, ctx, line))
        .chain(piped.map(Ok));

    match func {
        Func::Not => {
            if arity != 1 {
                return Err(wrong_args(func, "1", arity, line));
            }
            let value = next_value(&mut values, line)?;
            Ok(Value::Bool(!value.truth()))
        }
        Func::And | Func::Or => {
            if arity == 0 {
                return Err(wrong_args(func, "at least 1", arity, line));
            }
            let stop_on = func == Func::Or;
            let mut last = None;
            for value in values {
                let value = value?;
                if value.truth() == stop_on {
                    return Ok(value);
                }
                last = Some(value);
            }
            last.ok_or_else(|| wrong_args(func, "at least 1", 0, line))
        }
        Func::Eq => {
            if arity < 2 {
                return Err(TemplateError::new(line, "missing argument for comparison"));
            }
            let first = next_value(&mut values, line)?;
            for other in values {
                if compare(&first, &other?, line)? {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        Func::Ne => {
            if arity != 2 {
                return Err(wrong_args(func, "2", arity, line));
            }
            let first = next_value(&mut values, line)?;
            let second = next_value(&mut values, line)?;
            Ok(Value::Bool(!compare(&first, &second, line)?))
        }
    }
}

fn next_value<I>(values: &mut I, line: usize) -> Result<Value, TemplateError>
where
    I: Iterator<Item = Result<Value, TemplateError>>,
{
    values
        .next()
        .unwrap_or_else(|| Err(TemplateError::new(line, "missing argument")))
}

fn compare(a: &Value, b: &Value, line: usize) -> Result<bool, TemplateError> {
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => Ok(x == y),
        (Value::Bool(x), Value::Bool(y)) => Ok(x == y),
        (Value::Context { .. }, _) | (_, Value::Context { .. }) => Err(TemplateError::new(
            line,
            "error calling eq: non-comparable type",
        )),
        _ => Err(TemplateError::new(
            line,
            format!(
                "error calling eq: incompatible types for comparison: {} and {}",
                a.type_name(),
                b.type_name()
            ),
        )),
    }
}

fn wrong_args(func: Func, want: &str, got: usize, line: usize) -> TemplateError {
    TemplateError::new(
        line,
        format!("wrong number of args for {}: want {want} got {got}", func.name()),
    )
}
