//! Grammar rules for parsing declaration files.
//!
//! The source is tokenized first, then a stateful recursive-descent parser
//! walks the token list. Statements the analyzer has no use for are skipped
//! by balancing brackets up to the next `;` or closing `}`; structural errors
//! (unbalanced brackets, unexpected tokens inside a recognized construct)
//! fail the whole file.

use pattern_core::{ast::*, ParseError};

use crate::doc::parse_doc_comment;
use crate::lexer::{tokenize, Token, TokenKind};

/// Parse a complete declaration file.
pub fn parse(input: &str) -> Result<Module, ParseError> {
    let source = input.strip_prefix('\u{feff}').unwrap_or(input);
    let tokens = tokenize(source)?;
    let mut parser = Parser::new(source, &tokens);
    parser.parse_module()
}

/// Words that may prefix a class or interface member.
const MEMBER_MODIFIERS: &[&str] = &[
    "public", "private", "protected", "static", "readonly", "abstract", "declare", "override",
    "accessor",
];

/// Words that may prefix a constructor parameter.
const PARAM_MODIFIERS: &[&str] = &["public", "private", "protected", "readonly", "override"];

/// Words that start a new statement; used to recover from a missing `;`.
const STATEMENT_KEYWORDS: &[&str] = &[
    "export", "import", "declare", "interface", "class", "type", "const", "let", "var", "enum",
    "namespace", "module", "function", "abstract",
];

fn is_opener(p: &str) -> bool {
    matches!(p, "(" | "[" | "{")
}

fn is_closer(p: &str) -> bool {
    matches!(p, ")" | "]" | "}")
}

fn closer_of(open: &str) -> &'static str {
    match open {
        "(" => ")",
        "[" => "]",
        _ => "}",
    }
}

fn unbalanced(p: &str, token: &Token) -> ParseError {
    ParseError::UnbalancedDelimiter {
        delimiter: p.chars().next().unwrap_or('?'),
        line: token.span.line,
        column: token.span.column,
    }
}

/// Stateful parser that tracks position in the token list.
struct Parser<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, tokens: &'a [Token]) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
        }
    }

    // ----- token access -----

    fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek(&self, n: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + n)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn current_ident(&self) -> Option<&'a str> {
        self.peek_ident(0)
    }

    fn peek_ident(&self, n: usize) -> Option<&'a str> {
        match self.peek(n).map(|t| &t.kind) {
            Some(TokenKind::Ident(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    fn current_string(&self) -> Option<&'a str> {
        match self.current().map(|t| &t.kind) {
            Some(TokenKind::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    fn peek_punct(&self, n: usize, p: &str) -> bool {
        matches!(self.peek(n).map(|t| &t.kind), Some(TokenKind::Punct(q)) if *q == p)
    }

    fn at_punct(&self, p: &str) -> bool {
        self.peek_punct(0, p)
    }

    fn peek_word(&self, n: usize, word: &str) -> bool {
        self.peek_ident(n) == Some(word)
    }

    fn at_word(&self, word: &str) -> bool {
        self.peek_word(0, word)
    }

    fn eat_punct(&mut self, p: &str) -> bool {
        let found = self.at_punct(p);
        if found {
            self.advance();
        }
        found
    }

    fn eat_word(&mut self, word: &str) -> bool {
        let found = self.at_word(word);
        if found {
            self.advance();
        }
        found
    }

    fn current_newline(&self) -> bool {
        self.current().map_or(false, |t| t.newline_before)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.current() {
            Some(token) => ParseError::UnexpectedToken {
                found: token.describe(),
                expected: expected.to_string(),
                line: token.span.line,
                column: token.span.column,
            },
            None => ParseError::UnexpectedEof {
                expected: expected.to_string(),
            },
        }
    }

    fn expect_punct(&mut self, p: &str) -> Result<(), ParseError> {
        if self.eat_punct(p) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{p}'")))
        }
    }

    fn expect_word(&mut self, word: &str) -> Result<(), ParseError> {
        if self.eat_word(word) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{word}'")))
        }
    }

    fn expect_name(&mut self, what: &str) -> Result<String, ParseError> {
        match self.current_ident() {
            Some(name) => {
                self.advance();
                Ok(name.to_string())
            }
            None => Err(self.unexpected(what)),
        }
    }

    fn expect_name_or_string(&mut self, what: &str) -> Result<String, ParseError> {
        if let Some(s) = self.current_string() {
            self.advance();
            return Ok(s.to_string());
        }
        self.expect_name(what)
    }

    fn expect_string(&mut self, what: &str) -> Result<String, ParseError> {
        match self.current_string() {
            Some(s) => {
                self.advance();
                Ok(s.to_string())
            }
            None => Err(self.unexpected(what)),
        }
    }

    /// Whether the token at offset `n` can start a type.
    fn peek_starts_type(&self, n: usize) -> bool {
        match self.peek(n).map(|t| &t.kind) {
            Some(TokenKind::Ident(_) | TokenKind::Str(_) | TokenKind::Num(_)) => true,
            Some(TokenKind::Punct(p)) => matches!(*p, "(" | "[" | "{" | "-" | "<"),
            None => false,
        }
    }

    /// Whether the token at offset `n` can start a member name.
    fn peek_starts_member_name(&self, n: usize) -> bool {
        match self.peek(n).map(|t| &t.kind) {
            Some(TokenKind::Ident(_) | TokenKind::Str(_) | TokenKind::Num(_)) => true,
            Some(TokenKind::Punct(p)) => matches!(*p, "[" | "#"),
            None => false,
        }
    }

    fn doc_here(&self) -> Option<DocComment> {
        self.current()
            .and_then(|t| t.doc.as_deref())
            .map(parse_doc_comment)
    }

    fn start_span(&self) -> Span {
        match self.current() {
            Some(token) => token.span,
            None => Span {
                start: self.source.len(),
                end: self.source.len(),
                ..Default::default()
            },
        }
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        let end = match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.span.end.max(start.start),
            None => start.end,
        };
        Span { end, ..start }
    }

    /// Source text covered by the tokens in `from..to`.
    fn text_between(&self, from: usize, to: usize) -> String {
        if to <= from || to > self.tokens.len() {
            return String::new();
        }
        let start = self.tokens[from].span.start;
        let end = self.tokens[to - 1].span.end;
        self.source[start..end].trim().to_string()
    }

    // ----- skipping -----

    /// Skip a bracketed group starting at the current opener.
    fn skip_balanced(&mut self) -> Result<(), ParseError> {
        let mut stack: Vec<(&'static str, &'a Token)> = Vec::new();

        loop {
            let Some(token) = self.current() else {
                return match stack.last() {
                    Some((open, token)) => Err(unbalanced(open, token)),
                    None => Ok(()),
                };
            };

            if let TokenKind::Punct(p) = token.kind {
                if is_opener(p) {
                    stack.push((p, token));
                } else if is_closer(p) {
                    match stack.pop() {
                        Some((open, _)) if closer_of(open) == p => {}
                        _ => return Err(unbalanced(p, token)),
                    }
                }
            }

            self.advance();
            if stack.is_empty() {
                return Ok(());
            }
        }
    }

    /// Skip tokens up to (not including) one of `stops` or an enclosing closer.
    fn skip_until(&mut self, stops: &[&str]) -> Result<(), ParseError> {
        while let Some(token) = self.current() {
            match &token.kind {
                TokenKind::Punct(p) if stops.contains(p) || is_closer(p) => return Ok(()),
                TokenKind::Punct(p) if is_opener(p) => self.skip_balanced()?,
                _ => self.advance(),
            }
        }
        Ok(())
    }

    /// Skip an unrecognized statement.
    fn skip_statement(&mut self) -> Result<(), ParseError> {
        let start = self.pos;

        while let Some(token) = self.current() {
            if self.pos > start && token.newline_before {
                if let TokenKind::Ident(word) = &token.kind {
                    if STATEMENT_KEYWORDS.contains(&word.as_str()) && self.ends_expression() {
                        return Ok(());
                    }
                }
            }

            match &token.kind {
                TokenKind::Punct(";") => {
                    self.advance();
                    return Ok(());
                }
                TokenKind::Punct("{") => {
                    self.skip_balanced()?;
                    if !self.at_punct(".") && !self.at_punct("(") {
                        return Ok(());
                    }
                }
                TokenKind::Punct(p) if is_opener(p) => self.skip_balanced()?,
                TokenKind::Punct(p) if is_closer(p) => {
                    if self.pos == start {
                        return Err(unbalanced(p, token));
                    }
                    return Ok(());
                }
                _ => self.advance(),
            }
        }

        Ok(())
    }

    /// Whether the previous token could end an expression.
    fn ends_expression(&self) -> bool {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => match &token.kind {
                TokenKind::Punct(p) => matches!(*p, ")" | "]" | "}"),
                _ => true,
            },
            None => false,
        }
    }

    fn skip_decorators(&mut self) -> Result<(), ParseError> {
        while self.eat_punct("@") {
            self.parse_qualified_name()?;
            if self.at_punct("(") {
                self.skip_balanced()?;
            }
        }
        Ok(())
    }

    // ----- statements -----

    fn parse_module(&mut self) -> Result<Module, ParseError> {
        let statements = self.parse_statements(false)?;
        Ok(Module {
            statements,
            span: Span {
                start: 0,
                end: self.source.len(),
                line: 1,
                column: 1,
            },
        })
    }

    /// Parse statements up to end of input, or up to the closing `}` of a block.
    fn parse_statements(&mut self, in_block: bool) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();

        loop {
            let Some(token) = self.current() else {
                if in_block {
                    return Err(ParseError::UnexpectedEof {
                        expected: "'}'".to_string(),
                    });
                }
                break;
            };

            if let TokenKind::Punct(p) = token.kind {
                if is_closer(p) {
                    if in_block && p == "}" {
                        break;
                    }
                    return Err(unbalanced(p, token));
                }
            }

            if let Some(statement) = self.parse_statement()? {
                statements.push(statement);
            }
        }

        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Option<Statement>, ParseError> {
        if self.eat_punct(";") {
            return Ok(None);
        }
        self.skip_decorators()?;

        let doc = self.doc_here();
        let start = self.start_span();

        if self.at_word("import") && !self.peek_punct(1, "(") && !self.peek_punct(1, ".") {
            return self.parse_import(start);
        }
        if self.at_word("export") {
            return self.parse_export(start, doc);
        }

        self.parse_declaration(Modifiers::default(), start, doc)
    }

    fn parse_import(&mut self, start: Span) -> Result<Option<Statement>, ParseError> {
        self.advance(); // import

        let mut decl = ImportDecl {
            specifier: String::new(),
            default: None,
            namespace: None,
            named: Vec::new(),
            span: start,
        };

        // import './side-effect';
        if let Some(specifier) = self.current_string() {
            self.advance();
            self.eat_punct(";");
            decl.specifier = specifier.to_string();
            decl.span = self.span_from(start);
            return Ok(Some(Statement::Import(decl)));
        }

        if self.at_word("type") && !self.peek_punct(1, ",") && !self.peek_word(1, "from") {
            self.advance();
        }

        if let Some(name) = self.current_ident() {
            self.advance();

            if self.eat_punct("=") {
                // import X = require('x');
                if self.eat_word("require") {
                    self.expect_punct("(")?;
                    decl.specifier = self.expect_string("module specifier")?;
                    self.expect_punct(")")?;
                    self.eat_punct(";");
                    decl.namespace = Some(name.to_string());
                    decl.span = self.span_from(start);
                    return Ok(Some(Statement::Import(decl)));
                }
                self.skip_statement()?;
                return Ok(None);
            }

            decl.default = Some(name.to_string());
            self.eat_punct(",");
        }

        if self.eat_punct("*") {
            self.expect_word("as")?;
            decl.namespace = Some(self.expect_name("namespace alias")?);
        } else if self.at_punct("{") {
            decl.named = self
                .parse_specifiers()?
                .into_iter()
                .map(|(imported, local)| ImportSpecifier { imported, local })
                .collect();
        }

        self.expect_word("from")?;
        decl.specifier = self.expect_string("module specifier")?;
        self.eat_punct(";");
        decl.span = self.span_from(start);

        Ok(Some(Statement::Import(decl)))
    }

    /// Parse `{ a, b as c, type d }` into `(name, alias)` pairs.
    fn parse_specifiers(&mut self) -> Result<Vec<(String, String)>, ParseError> {
        self.expect_punct("{")?;
        let mut specifiers = Vec::new();

        while !self.eat_punct("}") {
            if self.at_word("type") && (self.peek_ident(1).is_some() || self.peek(1).map_or(false, |t| matches!(t.kind, TokenKind::Str(_)))) {
                self.advance();
            }
            let name = self.expect_name_or_string("specifier name")?;
            let alias = if self.eat_word("as") {
                self.expect_name_or_string("specifier alias")?
            } else {
                name.clone()
            };
            specifiers.push((name, alias));

            if !self.eat_punct(",") {
                self.expect_punct("}")?;
                break;
            }
        }

        Ok(specifiers)
    }

    fn parse_export(
        &mut self,
        start: Span,
        doc: Option<DocComment>,
    ) -> Result<Option<Statement>, ParseError> {
        self.advance(); // export

        // export = React;
        if self.eat_punct("=") {
            let target = self.parse_export_target()?;
            return Ok(Some(Statement::ExportAssignment(ExportAssignment {
                target,
                is_default: false,
                span: self.span_from(start),
            })));
        }

        // export as namespace React;
        if self.at_word("as") && self.peek_word(1, "namespace") {
            self.pos += 2;
            let name = self.expect_name("namespace name")?;
            self.eat_punct(";");
            return Ok(Some(Statement::ExportAsNamespace(name)));
        }

        // export * [as ns] from '...';
        if self.eat_punct("*") {
            let alias = if self.eat_word("as") {
                Some(self.expect_name("export alias")?)
            } else {
                None
            };
            self.expect_word("from")?;
            let from = self.expect_string("module specifier")?;
            self.eat_punct(";");
            return Ok(Some(Statement::ExportAll(ExportAllDecl {
                from,
                alias,
                span: self.span_from(start),
            })));
        }

        // export [type] { a as b } [from '...'];
        if self.at_punct("{") || (self.at_word("type") && self.peek_punct(1, "{")) {
            self.eat_word("type");
            let specifiers = self
                .parse_specifiers()?
                .into_iter()
                .map(|(local, exported)| ExportSpecifier { local, exported })
                .collect();
            let from = if self.eat_word("from") {
                Some(self.expect_string("module specifier")?)
            } else {
                None
            };
            self.eat_punct(";");
            return Ok(Some(Statement::ExportNamed(ExportNamedDecl {
                specifiers,
                from,
                span: self.span_from(start),
            })));
        }

        // export import A = B.C;
        if self.at_word("import") {
            self.skip_statement()?;
            return Ok(None);
        }

        let mut modifiers = Modifiers {
            export: true,
            ..Default::default()
        };

        if self.eat_word("default") {
            modifiers.default = true;
            if !self.at_declaration_keyword() {
                let target = self.parse_export_target()?;
                return Ok(Some(Statement::ExportAssignment(ExportAssignment {
                    target,
                    is_default: true,
                    span: self.span_from(start),
                })));
            }
        }

        self.parse_declaration(modifiers, start, doc)
    }

    fn at_declaration_keyword(&self) -> bool {
        match self.current_ident() {
            Some("class" | "interface" | "function" | "enum" | "declare") => true,
            Some("abstract") => self.peek_word(1, "class"),
            Some("async") => self.peek_word(1, "function"),
            _ => false,
        }
    }

    /// Parse the expression of `export default` / `export =`.
    ///
    /// Only plain (dotted) names are kept; anything else is skipped.
    fn parse_export_target(&mut self) -> Result<Option<QualifiedName>, ParseError> {
        let start = self.pos;

        if self.current_ident().is_some() {
            let name = self.parse_qualified_name()?;
            let at_end = match self.current() {
                None => true,
                Some(token) => {
                    token.newline_before
                        || matches!(token.kind, TokenKind::Punct(";") | TokenKind::Punct("}"))
                }
            };
            if at_end {
                self.eat_punct(";");
                return Ok(Some(name));
            }
        }

        self.pos = start;
        self.skip_statement()?;
        Ok(None)
    }

    fn parse_declaration(
        &mut self,
        mut modifiers: Modifiers,
        start: Span,
        doc: Option<DocComment>,
    ) -> Result<Option<Statement>, ParseError> {
        loop {
            match self.current_ident() {
                Some("declare") if self.peek_ident(1).is_some() => modifiers.declare = true,
                Some("abstract") if self.peek_word(1, "class") => modifiers.is_abstract = true,
                Some("export") if self.peek_ident(1).is_some() => modifiers.export = true,
                Some("default") if modifiers.export => modifiers.default = true,
                Some("async") if self.peek_word(1, "function") => {}
                _ => break,
            }
            self.advance();
        }

        let Some(word) = self.current_ident() else {
            self.skip_statement()?;
            return Ok(None);
        };

        let statement = match word {
            "interface" if self.peek_ident(1).is_some() => {
                Statement::Interface(self.parse_interface(modifiers, start, doc)?)
            }
            "class" => Statement::Class(self.parse_class(modifiers, start, doc)?),
            "enum" if self.peek_ident(1).is_some() => {
                Statement::Enum(self.parse_enum(false, modifiers, start, doc)?)
            }
            "const" if self.peek_word(1, "enum") => {
                self.advance();
                Statement::Enum(self.parse_enum(true, modifiers, start, doc)?)
            }
            "type" if self.peek_ident(1).is_some() => {
                Statement::TypeAlias(self.parse_type_alias(modifiers, start, doc)?)
            }
            "var" | "let" | "const" => {
                Statement::Variable(self.parse_variable(modifiers, start, doc)?)
            }
            "function" => Statement::Function(self.parse_function(modifiers, start)?),
            "namespace" | "module"
                if self.peek_ident(1).is_some()
                    || matches!(self.peek(1).map(|t| &t.kind), Some(TokenKind::Str(_))) =>
            {
                Statement::Namespace(self.parse_namespace(modifiers, start)?)
            }
            "global" if self.peek_punct(1, "{") => {
                Statement::Namespace(self.parse_namespace(modifiers, start)?)
            }
            _ => {
                self.skip_statement()?;
                return Ok(None);
            }
        };

        Ok(Some(statement))
    }

    fn parse_interface(
        &mut self,
        modifiers: Modifiers,
        start: Span,
        doc: Option<DocComment>,
    ) -> Result<InterfaceDecl, ParseError> {
        self.advance(); // interface
        let name = self.expect_name("interface name")?;
        let type_params = self.parse_type_params()?;

        let mut extends = Vec::new();
        if self.eat_word("extends") {
            loop {
                extends.push(self.parse_type_ref()?);
                if !self.eat_punct(",") {
                    break;
                }
            }
        }

        let members = self.parse_members_block()?;

        Ok(InterfaceDecl {
            name,
            type_params,
            extends,
            members,
            modifiers,
            doc,
            span: self.span_from(start),
        })
    }

    fn parse_class(
        &mut self,
        modifiers: Modifiers,
        start: Span,
        doc: Option<DocComment>,
    ) -> Result<ClassDecl, ParseError> {
        self.advance(); // class

        let name = match self.current_ident() {
            Some(word) if word != "extends" && word != "implements" => {
                self.advance();
                Some(word.to_string())
            }
            _ => None,
        };
        let type_params = self.parse_type_params()?;

        let extends = if self.eat_word("extends") {
            let base = self.parse_type_ref()?;
            // mixin calls like `extends Mixin(Base)` in non-declaration sources
            if self.at_punct("(") {
                self.skip_balanced()?;
            }
            Some(base)
        } else {
            None
        };

        let mut implements = Vec::new();
        if self.eat_word("implements") {
            loop {
                implements.push(self.parse_type_ref()?);
                if !self.eat_punct(",") {
                    break;
                }
            }
        }

        let members = self.parse_members_block()?;

        Ok(ClassDecl {
            name,
            type_params,
            extends,
            implements,
            members,
            modifiers,
            doc,
            span: self.span_from(start),
        })
    }

    fn parse_enum(
        &mut self,
        is_const: bool,
        modifiers: Modifiers,
        start: Span,
        doc: Option<DocComment>,
    ) -> Result<EnumDecl, ParseError> {
        self.advance(); // enum
        let name = self.expect_name("enum name")?;
        self.expect_punct("{")?;

        let mut members = Vec::new();
        while !self.eat_punct("}") {
            let member_doc = self.doc_here();
            let member_start = self.start_span();
            let member_name = self.expect_name_or_string("enum member name")?;
            let initializer = if self.eat_punct("=") {
                Some(self.parse_enum_initializer()?)
            } else {
                None
            };

            members.push(EnumMember {
                name: member_name,
                initializer,
                doc: member_doc,
                span: self.span_from(member_start),
            });

            if !self.eat_punct(",") {
                self.expect_punct("}")?;
                break;
            }
        }

        Ok(EnumDecl {
            name,
            members,
            is_const,
            modifiers,
            doc,
            span: self.span_from(start),
        })
    }

    fn parse_enum_initializer(&mut self) -> Result<EnumInitializer, ParseError> {
        let start = self.pos;
        let negative = self.eat_punct("-");
        let member_ends = self.peek_punct(1, ",") || self.peek_punct(1, "}");

        match self.current().map(|t| &t.kind) {
            Some(TokenKind::Num(n)) if member_ends => {
                let value = if negative { -*n } else { *n };
                self.advance();
                return Ok(EnumInitializer::Number(value));
            }
            Some(TokenKind::Str(s)) if member_ends && !negative => {
                let value = s.clone();
                self.advance();
                return Ok(EnumInitializer::String(value));
            }
            _ => {}
        }

        self.pos = start;
        self.skip_until(&[","])?;
        Ok(EnumInitializer::Other(self.text_between(start, self.pos)))
    }

    fn parse_type_alias(
        &mut self,
        modifiers: Modifiers,
        start: Span,
        doc: Option<DocComment>,
    ) -> Result<TypeAliasDecl, ParseError> {
        self.advance(); // type
        let name = self.expect_name("type alias name")?;
        let type_params = self.parse_type_params()?;
        self.expect_punct("=")?;
        let ty = self.parse_type()?;
        self.eat_punct(";");

        Ok(TypeAliasDecl {
            name,
            type_params,
            ty,
            modifiers,
            doc,
            span: self.span_from(start),
        })
    }

    fn parse_variable(
        &mut self,
        modifiers: Modifiers,
        start: Span,
        doc: Option<DocComment>,
    ) -> Result<VariableStatement, ParseError> {
        let kind = match self.current_ident() {
            Some("var") => VariableKind::Var,
            Some("let") => VariableKind::Let,
            _ => VariableKind::Const,
        };
        self.advance();

        let mut declarations = Vec::new();
        loop {
            let decl_start = self.start_span();

            if self.at_punct("{") || self.at_punct("[") {
                // destructuring patterns never name a single export
                self.skip_balanced()?;
                if self.eat_punct(":") {
                    self.parse_type()?;
                }
            } else {
                let name = self.expect_name("variable name")?;
                self.eat_punct("!");
                let ty = if self.eat_punct(":") {
                    Some(self.parse_type()?)
                } else {
                    None
                };
                declarations.push(VariableDecl {
                    name,
                    ty,
                    span: self.span_from(decl_start),
                });
            }

            if self.eat_punct("=") {
                self.skip_until(&[",", ";"])?;
            }
            if !self.eat_punct(",") {
                break;
            }
        }
        self.eat_punct(";");

        Ok(VariableStatement {
            kind,
            declarations,
            modifiers,
            doc,
            span: self.span_from(start),
        })
    }

    fn parse_function(&mut self, modifiers: Modifiers, start: Span) -> Result<FunctionDecl, ParseError> {
        self.advance(); // function
        self.eat_punct("*");

        let name = match self.current_ident() {
            Some(word) => {
                self.advance();
                Some(word.to_string())
            }
            None => None,
        };

        if self.at_punct("<") {
            self.parse_type_params()?;
        }
        self.parse_params()?;
        if self.eat_punct(":") {
            self.parse_return_type()?;
        }
        if self.at_punct("{") {
            self.skip_balanced()?;
        }
        self.eat_punct(";");

        Ok(FunctionDecl {
            name,
            modifiers,
            span: self.span_from(start),
        })
    }

    fn parse_namespace(&mut self, modifiers: Modifiers, start: Span) -> Result<NamespaceDecl, ParseError> {
        let name = if self.eat_word("global") {
            NamespaceName::Global
        } else {
            self.advance(); // namespace | module
            match self.current_string() {
                Some(specifier) => {
                    self.advance();
                    NamespaceName::Module(specifier.to_string())
                }
                None => NamespaceName::Name(self.parse_qualified_name()?),
            }
        };

        // declare module 'foo';
        if !self.at_punct("{") {
            self.eat_punct(";");
            return Ok(NamespaceDecl {
                name,
                body: Vec::new(),
                modifiers,
                span: self.span_from(start),
            });
        }

        self.expect_punct("{")?;
        let body = self.parse_statements(true)?;
        self.expect_punct("}")?;

        Ok(NamespaceDecl {
            name,
            body,
            modifiers,
            span: self.span_from(start),
        })
    }

    // ----- members -----

    fn parse_members_block(&mut self) -> Result<Vec<Member>, ParseError> {
        self.expect_punct("{")?;
        let mut members = Vec::new();

        loop {
            if self.eat_punct("}") {
                break;
            }
            if self.current().is_none() {
                return Err(self.unexpected("'}'"));
            }
            if self.eat_punct(";") || self.eat_punct(",") {
                continue;
            }

            members.push(self.parse_member()?);

            if self.eat_punct(";")
                || self.eat_punct(",")
                || self.at_punct("}")
                || self.current_newline()
            {
                continue;
            }
            return Err(self.unexpected("';' or '}' after member"));
        }

        Ok(members)
    }

    fn parse_member(&mut self) -> Result<Member, ParseError> {
        self.skip_decorators()?;
        let doc = self.doc_here();
        let start = self.start_span();

        let mut member = Member {
            kind: MemberKind::Property,
            name: None,
            optional: false,
            readonly: false,
            is_static: false,
            ty: None,
            doc,
            span: start,
        };

        while let Some(word) = self.current_ident() {
            if !MEMBER_MODIFIERS.contains(&word) || !self.peek_starts_member_name(1) {
                break;
            }
            match word {
                "readonly" => member.readonly = true,
                "static" => member.is_static = true,
                _ => {}
            }
            self.advance();
        }

        if self.at_punct("(") || self.at_punct("<") {
            member.kind = MemberKind::Call;
            member.ty = self.parse_signature_rest()?.1;
        } else if self.at_word("new") && (self.peek_punct(1, "(") || self.peek_punct(1, "<")) {
            self.advance();
            member.kind = MemberKind::Construct;
            member.ty = self.parse_signature_rest()?.1;
        } else if self.at_punct("[") && self.peek_ident(1).is_some() && self.peek_punct(2, ":") {
            self.advance(); // [
            self.advance(); // key name
            self.expect_punct(":")?;
            self.parse_type()?;
            self.expect_punct("]")?;
            member.kind = MemberKind::Index;
            member.optional = self.eat_punct("?");
            if self.eat_punct(":") {
                member.ty = Some(self.parse_type()?);
            }
        } else {
            let accessor = match self.current_ident() {
                Some("get") if self.peek_starts_member_name(1) => Some(MemberKind::Getter),
                Some("set") if self.peek_starts_member_name(1) => Some(MemberKind::Setter),
                _ => None,
            };
            if let Some(kind) = accessor {
                self.advance();
                member.kind = kind;
            }

            let name = self.parse_property_name()?;
            if accessor.is_none() && name == "constructor" && self.at_punct("(") {
                member.kind = MemberKind::Constructor;
            }
            member.name = Some(name);
            member.optional = self.eat_punct("?");
            self.eat_punct("!");

            if self.at_punct("(") || self.at_punct("<") {
                if member.kind == MemberKind::Property {
                    member.kind = MemberKind::Method;
                }
                let (params, ret) = self.parse_signature_rest()?;
                member.ty = match member.kind {
                    MemberKind::Setter => params.into_iter().next().and_then(|p| p.ty),
                    _ => ret,
                };
            } else if self.eat_punct(":") {
                member.ty = Some(self.parse_type()?);
            }

            if self.eat_punct("=") {
                self.skip_until(&[";", ","])?;
            }
        }

        let has_body = matches!(
            member.kind,
            MemberKind::Method | MemberKind::Getter | MemberKind::Setter | MemberKind::Constructor
        );
        if has_body && self.at_punct("{") {
            self.skip_balanced()?;
        }

        member.span = self.span_from(start);
        Ok(member)
    }

    fn parse_property_name(&mut self) -> Result<String, ParseError> {
        let Some(token) = self.current() else {
            return Err(self.unexpected("member name"));
        };

        match &token.kind {
            TokenKind::Ident(name) | TokenKind::Str(name) => {
                self.advance();
                Ok(name.clone())
            }
            TokenKind::Num(n) => {
                self.advance();
                Ok(n.to_string())
            }
            TokenKind::Punct("#") => {
                self.advance();
                let name = self.expect_name("private member name")?;
                Ok(format!("#{name}"))
            }
            TokenKind::Punct("[") => {
                let start = self.pos;
                self.skip_balanced()?;
                Ok(self.text_between(start, self.pos))
            }
            _ => Err(self.unexpected("member name")),
        }
    }

    /// Parse `<T>(params): Ret` after a member or signature name.
    fn parse_signature_rest(&mut self) -> Result<(Vec<Param>, Option<TypeExpr>), ParseError> {
        if self.at_punct("<") {
            self.parse_type_params()?;
        }
        let params = self.parse_params()?;
        let ret = if self.eat_punct(":") {
            Some(self.parse_return_type()?)
        } else {
            None
        };
        Ok((params, ret))
    }

    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect_punct("(")?;
        let mut params = Vec::new();

        while !self.eat_punct(")") {
            self.skip_decorators()?;
            while let Some(word) = self.current_ident() {
                if PARAM_MODIFIERS.contains(&word) && self.peek_ident(1).is_some() {
                    self.advance();
                } else {
                    break;
                }
            }

            let rest = self.eat_punct("...");
            let name = if self.at_punct("{") || self.at_punct("[") {
                self.skip_balanced()?;
                String::new()
            } else {
                self.expect_name("parameter name")?
            };
            let optional = self.eat_punct("?");
            let ty = if self.eat_punct(":") {
                Some(self.parse_type()?)
            } else {
                None
            };
            if self.eat_punct("=") {
                self.skip_until(&[","])?;
            }

            params.push(Param {
                name,
                ty,
                optional,
                rest,
            });

            if !self.eat_punct(",") {
                self.expect_punct(")")?;
                break;
            }
        }

        Ok(params)
    }

    fn parse_type_params(&mut self) -> Result<Vec<TypeParam>, ParseError> {
        if !self.eat_punct("<") {
            return Ok(Vec::new());
        }

        let mut params = Vec::new();
        while !self.eat_punct(">") {
            while matches!(self.current_ident(), Some("in" | "out" | "const"))
                && self.peek_ident(1).is_some()
            {
                self.advance();
            }

            let name = self.expect_name("type parameter")?;
            let constraint = if self.eat_word("extends") {
                Some(self.parse_type()?)
            } else {
                None
            };
            let default = if self.eat_punct("=") {
                Some(self.parse_type()?)
            } else {
                None
            };
            params.push(TypeParam {
                name,
                constraint,
                default,
            });

            if !self.eat_punct(",") {
                self.expect_punct(">")?;
                break;
            }
        }

        Ok(params)
    }

    // ----- types -----

    fn parse_qualified_name(&mut self) -> Result<QualifiedName, ParseError> {
        let mut parts = vec![self.expect_name("name")?];
        while self.at_punct(".") && self.peek_ident(1).is_some() {
            self.advance();
            parts.push(self.expect_name("name")?);
        }
        Ok(QualifiedName(parts.into_iter().collect()))
    }

    fn parse_type_ref(&mut self) -> Result<TypeRef, ParseError> {
        let start = self.start_span();
        let name = self.parse_qualified_name()?;
        let args = self.parse_type_args()?;
        Ok(TypeRef {
            name,
            args,
            span: self.span_from(start),
        })
    }

    fn parse_type_args(&mut self) -> Result<Vec<TypeExpr>, ParseError> {
        if !self.at_punct("<") || self.current_newline() {
            return Ok(Vec::new());
        }
        self.advance();

        let mut args = Vec::new();
        while !self.eat_punct(">") {
            args.push(self.parse_type()?);
            if !self.eat_punct(",") {
                self.expect_punct(">")?;
                break;
            }
        }
        Ok(args)
    }

    fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        self.parse_type_inner(true)
    }

    fn parse_type_inner(&mut self, allow_conditional: bool) -> Result<TypeExpr, ParseError> {
        if self.at_function_type() {
            return self.parse_function_type();
        }

        let start = self.pos;
        let ty = self.parse_union()?;

        // T extends U ? X : Y
        if allow_conditional && self.at_word("extends") && !self.current_newline() {
            self.advance();
            self.parse_type_inner(false)?;
            self.expect_punct("?")?;
            self.parse_type()?;
            self.expect_punct(":")?;
            self.parse_type()?;
            return Ok(TypeExpr::Unsupported(self.text_between(start, self.pos)));
        }

        Ok(ty)
    }

    /// Whether a function or constructor type starts here.
    fn at_function_type(&self) -> bool {
        if self.at_punct("<") {
            return true;
        }
        if self.at_word("new") && (self.peek_punct(1, "(") || self.peek_punct(1, "<")) {
            return true;
        }
        if self.at_word("abstract") && self.peek_word(1, "new") {
            return true;
        }
        if !self.at_punct("(") {
            return false;
        }

        // Find the matching `)` and look for `=>` after it.
        let mut depth = 0usize;
        for (offset, token) in self.tokens[self.pos..].iter().enumerate() {
            if let TokenKind::Punct(p) = token.kind {
                if is_opener(p) {
                    depth += 1;
                } else if is_closer(p) {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return self.peek_punct(offset + 1, "=>");
                    }
                }
            }
        }
        false
    }

    fn parse_function_type(&mut self) -> Result<TypeExpr, ParseError> {
        self.eat_word("abstract");
        let is_constructor = self.eat_word("new");
        if self.at_punct("<") {
            self.parse_type_params()?;
        }
        let params = self.parse_params()?;
        self.expect_punct("=>")?;
        let ret = self.parse_return_type()?;

        Ok(TypeExpr::Function(Box::new(FunctionType {
            params,
            ret,
            is_constructor,
        })))
    }

    /// Return types may be type predicates (`x is T`, `asserts x`).
    fn parse_return_type(&mut self) -> Result<TypeExpr, ParseError> {
        if self.current_ident().is_some() && self.peek_word(1, "is") {
            self.pos += 2;
            self.parse_type()?;
            return Ok(TypeExpr::Keyword(KeywordType::Boolean));
        }
        if self.at_word("asserts") && self.peek_ident(1).is_some() {
            self.pos += 2;
            if self.eat_word("is") {
                self.parse_type()?;
            }
            return Ok(TypeExpr::Keyword(KeywordType::Void));
        }
        self.parse_type()
    }

    fn parse_union(&mut self) -> Result<TypeExpr, ParseError> {
        self.eat_punct("|");
        let mut arms = vec![self.parse_intersection()?];
        while self.eat_punct("|") {
            arms.push(self.parse_intersection()?);
        }
        Ok(if arms.len() == 1 {
            arms.remove(0)
        } else {
            TypeExpr::Union(arms)
        })
    }

    fn parse_intersection(&mut self) -> Result<TypeExpr, ParseError> {
        self.eat_punct("&");
        let mut parts = vec![self.parse_type_operator()?];
        while self.eat_punct("&") {
            parts.push(self.parse_type_operator()?);
        }
        Ok(if parts.len() == 1 {
            parts.remove(0)
        } else {
            TypeExpr::Intersection(parts)
        })
    }

    fn parse_type_operator(&mut self) -> Result<TypeExpr, ParseError> {
        let op = match self.current_ident() {
            Some("keyof") if self.peek_starts_type(1) => Some(TypeOperator::KeyOf),
            Some("readonly") if self.peek_starts_type(1) => Some(TypeOperator::Readonly),
            Some("unique") if self.peek_word(1, "symbol") => Some(TypeOperator::Unique),
            Some("infer") if self.peek_ident(1).is_some() => {
                let start = self.pos;
                self.pos += 2;
                return Ok(TypeExpr::Unsupported(self.text_between(start, self.pos)));
            }
            _ => None,
        };

        match op {
            Some(op) => {
                self.advance();
                let ty = self.parse_type_operator()?;
                Ok(TypeExpr::Operator {
                    op,
                    ty: Box::new(ty),
                })
            }
            None => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Result<TypeExpr, ParseError> {
        let mut ty = self.parse_primary()?;

        while self.at_punct("[") && !self.current_newline() {
            self.advance();
            if self.eat_punct("]") {
                ty = TypeExpr::Array(Box::new(ty));
            } else {
                let index = self.parse_type()?;
                self.expect_punct("]")?;
                ty = TypeExpr::IndexedAccess {
                    object: Box::new(ty),
                    index: Box::new(index),
                };
            }
        }

        Ok(ty)
    }

    fn parse_primary(&mut self) -> Result<TypeExpr, ParseError> {
        let Some(token) = self.current() else {
            return Err(self.unexpected("type"));
        };

        match &token.kind {
            TokenKind::Punct("(") => {
                self.advance();
                let ty = self.parse_type()?;
                self.expect_punct(")")?;
                Ok(ty)
            }
            TokenKind::Punct("{") => {
                if self.at_mapped_type() {
                    let start = self.pos;
                    self.skip_balanced()?;
                    Ok(TypeExpr::Unsupported(self.text_between(start, self.pos)))
                } else {
                    Ok(TypeExpr::Object(self.parse_members_block()?))
                }
            }
            TokenKind::Punct("[") => self.parse_tuple(),
            TokenKind::Punct("-") => {
                self.advance();
                match self.current().map(|t| &t.kind) {
                    Some(TokenKind::Num(n)) => {
                        let value = -*n;
                        self.advance();
                        Ok(TypeExpr::Literal(LiteralType::Number(value)))
                    }
                    _ => Err(self.unexpected("numeric literal")),
                }
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(TypeExpr::Literal(LiteralType::String(s.clone())))
            }
            TokenKind::Num(n) => {
                self.advance();
                Ok(TypeExpr::Literal(LiteralType::Number(*n)))
            }
            TokenKind::Ident(word) => match word.as_str() {
                "true" | "false" => {
                    self.advance();
                    Ok(TypeExpr::Literal(LiteralType::Boolean(word == "true")))
                }
                "typeof" => {
                    self.advance();
                    if self.at_word("import") {
                        return self.parse_import_type();
                    }
                    let name = self.parse_qualified_name()?;
                    self.parse_type_args()?;
                    Ok(TypeExpr::Query(name))
                }
                "import" if self.peek_punct(1, "(") => self.parse_import_type(),
                _ => match KeywordType::from_keyword(word) {
                    Some(keyword) if !self.peek_punct(1, ".") => {
                        self.advance();
                        Ok(TypeExpr::Keyword(keyword))
                    }
                    _ => Ok(TypeExpr::Reference(self.parse_type_ref()?)),
                },
            },
            _ => Err(self.unexpected("type")),
        }
    }

    /// `import('module').Name<Args>`
    fn parse_import_type(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.pos;
        self.expect_word("import")?;
        self.skip_balanced()?;
        while self.at_punct(".") && self.peek_ident(1).is_some() {
            self.pos += 2;
        }
        self.parse_type_args()?;
        Ok(TypeExpr::Unsupported(self.text_between(start, self.pos)))
    }

    fn at_mapped_type(&self) -> bool {
        let mut n = 1;
        if self.peek_punct(n, "+") || self.peek_punct(n, "-") {
            n += 1;
        }
        if self.peek_word(n, "readonly") {
            n += 1;
        }
        self.peek_punct(n, "[") && self.peek_ident(n + 1).is_some() && self.peek_word(n + 2, "in")
    }

    fn parse_tuple(&mut self) -> Result<TypeExpr, ParseError> {
        self.expect_punct("[")?;
        let mut elements = Vec::new();

        while !self.eat_punct("]") {
            self.eat_punct("...");
            // labeled element: `name: T` or `name?: T`
            if self.current_ident().is_some()
                && (self.peek_punct(1, ":") || (self.peek_punct(1, "?") && self.peek_punct(2, ":")))
            {
                self.advance();
                self.eat_punct("?");
                self.expect_punct(":")?;
                self.eat_punct("...");
            }
            elements.push(self.parse_type()?);
            self.eat_punct("?");

            if !self.eat_punct(",") {
                self.expect_punct("]")?;
                break;
            }
        }

        Ok(TypeExpr::Tuple(elements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(input: &str) -> Statement {
        let module = parse(input).unwrap();
        assert_eq!(module.statements.len(), 1, "{:?}", module.statements);
        module.statements.into_iter().next().unwrap()
    }

    fn type_of(input: &str) -> TypeExpr {
        match single(&format!("type T = {input};")) {
            Statement::TypeAlias(alias) => alias.ty,
            other => panic!("Expected type alias, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_component_declaration() {
        let input = r#"
import * as React from 'react';
export interface ButtonProps {
    label: string;
    size?: Size;
}
export declare enum Size {
    Small = 0,
    /** @name Extra large */
    Large = 1
}
export declare const Button: React.StatelessComponent<ButtonProps>;
export default Button;
"#;
        let module = parse(input).unwrap();
        assert_eq!(module.statements.len(), 5);
        assert!(!module.is_script());

        if let Statement::Import(import) = &module.statements[0] {
            assert_eq!(import.specifier, "react");
            assert_eq!(import.namespace.as_deref(), Some("React"));
        } else {
            panic!("Expected import");
        }

        if let Statement::Interface(iface) = &module.statements[1] {
            assert_eq!(iface.name, "ButtonProps");
            assert!(iface.modifiers.export);
            assert_eq!(iface.members.len(), 2);
            assert_eq!(iface.members[1].name.as_deref(), Some("size"));
            assert!(iface.members[1].optional);
        } else {
            panic!("Expected interface");
        }

        if let Statement::Enum(e) = &module.statements[2] {
            assert_eq!(e.members.len(), 2);
            assert_eq!(e.members[0].initializer, Some(EnumInitializer::Number(0.0)));
            let doc = e.members[1].doc.as_ref().unwrap();
            assert_eq!(doc.tag("name").as_deref(), Some("Extra large"));
        } else {
            panic!("Expected enum");
        }

        if let Statement::Variable(var) = &module.statements[3] {
            assert!(var.modifiers.export && var.modifiers.declare);
            let ty = var.declarations[0].ty.as_ref().unwrap();
            if let TypeExpr::Reference(r) = ty {
                assert_eq!(r.name.to_string(), "React.StatelessComponent");
                assert_eq!(r.args.len(), 1);
            } else {
                panic!("Expected reference type");
            }
        } else {
            panic!("Expected variable");
        }

        if let Statement::ExportAssignment(assign) = &module.statements[4] {
            assert!(assign.is_default);
            assert_eq!(assign.target, Some(QualifiedName::from("Button")));
        } else {
            panic!("Expected export default");
        }
    }

    #[test]
    fn test_parse_underscore_names() {
        let module = parse(
            "interface Props { label: string; _internal?: number; $ref: string }\n\
             declare const _default: React.SFC<Props>;\n\
             export default _default;",
        )
        .unwrap();
        assert_eq!(module.statements.len(), 3);

        if let Statement::Interface(iface) = &module.statements[0] {
            let names: Vec<_> = iface.members.iter().map(|m| m.name.as_deref()).collect();
            assert_eq!(names, vec![Some("label"), Some("_internal"), Some("$ref")]);
            assert!(iface.members[1].optional);
        } else {
            panic!("Expected interface");
        }

        if let Statement::Variable(var) = &module.statements[1] {
            assert_eq!(var.declarations[0].name, "_default");
        } else {
            panic!("Expected variable");
        }

        if let Statement::ExportAssignment(assign) = &module.statements[2] {
            assert!(assign.is_default);
            assert_eq!(assign.target, Some(QualifiedName::from("_default")));
        } else {
            panic!("Expected export default");
        }
    }

    #[test]
    fn test_parse_class_with_heritage() {
        let stmt = single(
            "export default class Card<T = {}> extends React.Component<CardProps, {}> implements A, B {\n\
               private x;\n\
               static defaultProps: Partial<CardProps>;\n\
               constructor(props: CardProps);\n\
               render(): JSX.Element | null;\n\
               get title(): string;\n\
             }",
        );
        if let Statement::Class(class) = stmt {
            assert_eq!(class.name.as_deref(), Some("Card"));
            assert!(class.modifiers.default);
            assert_eq!(class.type_params[0].name, "T");
            let base = class.extends.unwrap();
            assert_eq!(base.name.to_string(), "React.Component");
            assert_eq!(base.args.len(), 2);
            assert_eq!(class.implements.len(), 2);

            let kinds: Vec<_> = class.members.iter().map(|m| m.kind).collect();
            assert_eq!(
                kinds,
                vec![
                    MemberKind::Property,
                    MemberKind::Property,
                    MemberKind::Constructor,
                    MemberKind::Method,
                    MemberKind::Getter,
                ]
            );
            assert!(class.members[1].is_static);
        } else {
            panic!("Expected class");
        }
    }

    #[test]
    fn test_parse_namespace_and_export_equals() {
        let input = r#"
export = React;
export as namespace React;
declare namespace React {
    type SFC<P = {}> = StatelessComponent<P>;
    interface StatelessComponent<P = {}> {
        (props: P & { children?: ReactNode }, context?: any): ReactElement<any> | null;
        propTypes?: ValidationMap<P>;
    }
    class Component<P, S> {
        constructor(props: Readonly<P>);
        readonly props: Readonly<{ children?: ReactNode }> & Readonly<P>;
    }
}
declare global {
    namespace JSX {
        interface Element {}
    }
}
"#;
        let module = parse(input).unwrap();
        assert_eq!(module.statements.len(), 4);

        if let Statement::Namespace(ns) = &module.statements[2] {
            assert_eq!(ns.name, NamespaceName::Name(QualifiedName::from("React")));
            assert!(ns.modifiers.declare);
            assert_eq!(ns.body.len(), 3);
            if let Statement::Interface(iface) = &ns.body[1] {
                assert_eq!(iface.members[0].kind, MemberKind::Call);
                assert!(iface.members[1].optional);
            } else {
                panic!("Expected interface");
            }
        } else {
            panic!("Expected namespace");
        }

        assert!(matches!(
            &module.statements[3],
            Statement::Namespace(NamespaceDecl { name: NamespaceName::Global, .. })
        ));
    }

    #[test]
    fn test_parse_import_forms() {
        let module = parse(
            "import React, { Component as C, type Props } from 'react';\n\
             import './styles';\n\
             import Foo = require('foo');\n\
             export { Button as default, Size } from './button';\n\
             export * from './icons';",
        )
        .unwrap();
        assert_eq!(module.statements.len(), 5);

        if let Statement::Import(import) = &module.statements[0] {
            assert_eq!(import.default.as_deref(), Some("React"));
            assert_eq!(import.named[0].imported, "Component");
            assert_eq!(import.named[0].local, "C");
            assert_eq!(import.named[1].imported, "Props");
        } else {
            panic!("Expected import");
        }

        if let Statement::Import(import) = &module.statements[2] {
            assert_eq!(import.namespace.as_deref(), Some("Foo"));
            assert_eq!(import.specifier, "foo");
        } else {
            panic!("Expected import-equals");
        }

        if let Statement::ExportNamed(export) = &module.statements[3] {
            assert_eq!(export.from.as_deref(), Some("./button"));
            assert_eq!(export.specifiers[0].exported, "default");
        } else {
            panic!("Expected named export");
        }
    }

    #[test]
    fn test_parse_union_and_arrays() {
        let ty = type_of("| 'a' | \"b\" | null");
        assert_eq!(
            ty,
            TypeExpr::Union(vec![
                TypeExpr::Literal(LiteralType::String("a".into())),
                TypeExpr::Literal(LiteralType::String("b".into())),
                TypeExpr::Keyword(KeywordType::Null),
            ])
        );

        assert_eq!(
            type_of("string[][]"),
            TypeExpr::Array(Box::new(TypeExpr::Array(Box::new(TypeExpr::Keyword(
                KeywordType::String
            )))))
        );

        assert!(matches!(
            type_of("readonly number[]"),
            TypeExpr::Operator { op: TypeOperator::Readonly, .. }
        ));
    }

    #[test]
    fn test_parse_function_types() {
        if let TypeExpr::Function(f) = type_of("(event: MouseEvent, ...rest: any[]) => void") {
            assert_eq!(f.params.len(), 2);
            assert!(f.params[1].rest);
            assert_eq!(f.ret, TypeExpr::Keyword(KeywordType::Void));
        } else {
            panic!("Expected function type");
        }

        // parenthesized type is not a function
        assert_eq!(type_of("(string)"), TypeExpr::Keyword(KeywordType::String));

        if let TypeExpr::Function(f) = type_of("new (props: P) => Component<P>") {
            assert!(f.is_constructor);
        } else {
            panic!("Expected constructor type");
        }
    }

    #[test]
    fn test_parse_unsupported_types() {
        assert!(matches!(
            type_of("T extends string ? A : B"),
            TypeExpr::Unsupported(_)
        ));
        assert!(matches!(
            type_of("{ readonly [K in keyof T]?: T[K] }"),
            TypeExpr::Unsupported(_)
        ));
        assert!(matches!(
            type_of("typeof import('./x').default"),
            TypeExpr::Unsupported(_)
        ));
    }

    #[test]
    fn test_parse_tuple_and_indexed_access() {
        assert_eq!(
            type_of("[first: string, second?: number]"),
            TypeExpr::Tuple(vec![
                TypeExpr::Keyword(KeywordType::String),
                TypeExpr::Keyword(KeywordType::Number),
            ])
        );
        assert!(matches!(
            type_of("JSX.IntrinsicElements['div']"),
            TypeExpr::IndexedAccess { .. }
        ));
    }

    #[test]
    fn test_parse_enum_initializers() {
        let stmt = single("declare const enum Flags { A = -1, B = 'b', C = 1 << 2, D }");
        if let Statement::Enum(e) = stmt {
            assert!(e.is_const);
            assert_eq!(e.members[0].initializer, Some(EnumInitializer::Number(-1.0)));
            assert_eq!(
                e.members[1].initializer,
                Some(EnumInitializer::String("b".into()))
            );
            assert_eq!(
                e.members[2].initializer,
                Some(EnumInitializer::Other("1 << 2".into()))
            );
            assert_eq!(e.members[3].initializer, None);
        } else {
            panic!("Expected enum");
        }
    }

    #[test]
    fn test_skips_unrecognized_statements() {
        let module = parse(
            "declare function connect<P>(c: P): (x: any) => P;\n\
             export default connect(mapState)(Button);\n\
             if (x) { y(); }\n\
             export interface A {}",
        )
        .unwrap();
        assert_eq!(module.statements.len(), 3);
        assert!(matches!(
            module.statements[1],
            Statement::ExportAssignment(ExportAssignment { target: None, .. })
        ));
        assert!(matches!(module.statements[2], Statement::Interface(_)));
    }

    #[test]
    fn test_script_detection() {
        let module = parse("declare namespace JSX { interface Element {} }").unwrap();
        assert!(module.is_script());
    }

    #[test]
    fn test_unbalanced_brace() {
        let err = parse("export interface A {\n  a: string;\n").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. } | ParseError::UnexpectedEof { .. }));

        let err = parse("declare const a: string;\n}").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnbalancedDelimiter {
                delimiter: '}',
                line: 2,
                column: 1
            }
        );
    }

    #[test]
    fn test_unexpected_token_in_interface() {
        let err = parse("interface A { a: string b: number }").unwrap_err();
        if let ParseError::UnexpectedToken { found, line, .. } = err {
            assert_eq!(found, "b");
            assert_eq!(line, 1);
        } else {
            panic!("Expected unexpected token error");
        }
    }
}
