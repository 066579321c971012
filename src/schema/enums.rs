//! Name↔value tables for the LSP 3.17 enums.
//!
//! `lsp-types` supplies the wire (de)serialization for these as opaque
//! newtypes but does not validate that a decoded value is one of the
//! protocol's named members — a stray `7` on a one-byte-off client is
//! silently accepted. These tables are what the codec consults to reject
//! it: integer enums reject out-of-range values, string enums reject
//! unknown names.

use crate::error::LspError;

macro_rules! int_enum {
    ($name:ident { $($variant:ident = $value:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant = $value),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn by_value(value: i32) -> Result<Self, LspError> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    other => Err(LspError::unknown_enum_value(stringify!($name), "value", other)),
                }
            }

            pub fn value(self) -> i32 {
                self as i32
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }

            pub fn by_name(name: &str) -> Result<Self, LspError> {
                match name {
                    $(stringify!($variant) => Ok(Self::$variant),)+
                    other => Err(LspError::unknown_enum_value(stringify!($name), "name", other)),
                }
            }
        }
    };
}

macro_rules! string_enum {
    ($name:ident { $($variant:ident = $value:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn by_value(value: &str) -> Result<Self, LspError> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    other => Err(LspError::unknown_enum_value(stringify!($name), "value", other)),
                }
            }

            pub fn value(self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }
        }
    };
}

int_enum!(SymbolKind {
    File = 1, Module = 2, Namespace = 3, Package = 4, Class = 5, Method = 6,
    Property = 7, Field = 8, Constructor = 9, Enum = 10, Interface = 11,
    Function = 12, Variable = 13, Constant = 14, StringKind = 15, Number = 16,
    Boolean = 17, Array = 18, Object = 19, Key = 20, Null = 21,
    EnumMember = 22, Struct = 23, Event = 24, Operator = 25, TypeParameter = 26,
});

int_enum!(SymbolTag {
    Deprecated = 1,
});

int_enum!(CompletionItemKind {
    Text = 1, Method = 2, Function = 3, Constructor = 4, Field = 5,
    Variable = 6, Class = 7, Interface = 8, Module = 9, Property = 10,
    Unit = 11, Value = 12, Enum = 13, Keyword = 14, Snippet = 15, Color = 16,
    File = 17, Reference = 18, Folder = 19, EnumMember = 20, Constant = 21,
    Struct = 22, Event = 23, Operator = 24, TypeParameter = 25,
});

int_enum!(CompletionItemTag {
    Deprecated = 1,
});

int_enum!(DiagnosticSeverity {
    Error = 1, Warning = 2, Information = 3, Hint = 4,
});

int_enum!(DiagnosticTag {
    Unnecessary = 1, Deprecated = 2,
});

int_enum!(WatchKind {
    Create = 1, Change = 2, Delete = 4,
});

int_enum!(InsertTextMode {
    AsIs = 1, AdjustIndentation = 2,
});

int_enum!(InsertTextFormat {
    PlainText = 1, Snippet = 2,
});

int_enum!(NotebookCellKind {
    Markup = 1, Code = 2,
});

int_enum!(PrepareSupportDefaultBehavior {
    Identifier = 1,
});

int_enum!(TextDocumentSyncKind {
    None = 0, Full = 1, Incremental = 2,
});

int_enum!(TextDocumentSaveReason {
    Manual = 1, AfterDelay = 2, FocusOut = 3,
});

int_enum!(MessageType {
    Error = 1, Warning = 2, Info = 3, Log = 4,
});

int_enum!(DocumentHighlightKind {
    Text = 1, Read = 2, Write = 3,
});

int_enum!(SignatureHelpTriggerKind {
    Invoked = 1, TriggerCharacter = 2, ContentChange = 3,
});

int_enum!(CompletionTriggerKind {
    Invoked = 1, TriggerCharacter = 2, TriggerForIncompleteCompletions = 3,
});

int_enum!(CodeActionTriggerKind {
    Invoked = 1, Automatic = 2,
});

int_enum!(FileChangeType {
    Created = 1, Changed = 2, Deleted = 3,
});

string_enum!(CodeActionKind {
    Empty = "",
    QuickFix = "quickfix",
    Refactor = "refactor",
    RefactorExtract = "refactor.extract",
    RefactorInline = "refactor.inline",
    RefactorRewrite = "refactor.rewrite",
    Source = "source",
    SourceOrganizeImports = "source.organizeImports",
    SourceFixAll = "source.fixAll",
    Notebook = "notebook",
});

string_enum!(MarkupKind {
    PlainText = "plaintext",
    Markdown = "markdown",
});

string_enum!(PositionEncodingKind {
    Utf8 = "utf-8",
    Utf16 = "utf-16",
    Utf32 = "utf-32",
});

string_enum!(TokenFormat {
    Relative = "relative",
});

string_enum!(FoldingRangeKind {
    Comment = "comment",
    Imports = "imports",
    Region = "region",
});

string_enum!(MonikerKind {
    Import = "import",
    Export = "export",
    Local = "local",
});

string_enum!(UniquenessLevel {
    Document = "document",
    Project = "project",
    Group = "group",
    Scheme = "scheme",
    Global = "global",
});

string_enum!(ResourceOperationKind {
    Create = "create",
    Rename = "rename",
    Delete = "delete",
});

string_enum!(FailureHandlingKind {
    Abort = "abort",
    Transactional = "transactional",
    TextOnlyTransactional = "textOnlyTransactional",
    Undo = "undo",
});

string_enum!(TraceValues {
    Off = "off",
    Messages = "messages",
    Verbose = "verbose",
});

string_enum!(DocumentDiagnosticReportKind {
    Full = "full",
    Unchanged = "unchanged",
});

string_enum!(FileOperationPatternKind {
    File = "file",
    Folder = "folder",
});
