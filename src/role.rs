//! Semantic role identifiers attached to canonical nodes through `@role`.
//!
//! A role is an integer id; the tree only ever stores the integer. The
//! constants below name the well-known ids shared with query and serialization
//! consumers. Ids outside the catalog are legal and simply have no name.

use std::fmt;

/// A semantic role identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Role(u32);

impl Role {
    pub const fn new(id: u32) -> Self {
        Role(id)
    }

    pub const fn id(self) -> u32 {
        self.0
    }

    /// Catalog name for a well-known id.
    pub fn name(self) -> Option<&'static str> {
        CATALOG
            .iter()
            .find(|(role, _)| *role == self)
            .map(|(_, name)| *name)
    }

    /// Looks a role up by its catalog name (case-sensitive, e.g. `"Incomplete"`).
    pub fn from_name(name: &str) -> Option<Role> {
        CATALOG
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(role, _)| *role)
    }
}

impl From<u32> for Role {
    fn from(id: u32) -> Self {
        Role(id)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "Role({})", self.0),
        }
    }
}

macro_rules! catalog {
    ($($konst:ident = $id:literal => $name:literal),* $(,)?) => {
        impl Role {
            $(pub const $konst: Role = Role($id);)*
        }

        const CATALOG: &[(Role, &str)] = &[$((Role::$konst, $name)),*];
    };
}

catalog! {
    INVALID = 0 => "Invalid",
    IDENTIFIER = 1 => "Identifier",
    QUALIFIED = 2 => "Qualified",
    OPERATOR = 3 => "Operator",
    BINARY = 4 => "Binary",
    UNARY = 5 => "Unary",
    LEFT = 6 => "Left",
    RIGHT = 7 => "Right",
    INFIX = 8 => "Infix",
    POSTFIX = 9 => "Postfix",
    BITWISE = 10 => "Bitwise",
    BOOLEAN = 11 => "Boolean",
    UNSIGNED = 12 => "Unsigned",
    LEFT_SHIFT = 13 => "LeftShift",
    RIGHT_SHIFT = 14 => "RightShift",
    OR = 15 => "Or",
    XOR = 16 => "Xor",
    AND = 17 => "And",
    EXPRESSION = 18 => "Expression",
    STATEMENT = 19 => "Statement",
    EQUAL = 20 => "Equal",
    NOT = 21 => "Not",
    LESS_THAN = 22 => "LessThan",
    LESS_THAN_OR_EQUAL = 23 => "LessThanOrEqual",
    GREATER_THAN = 24 => "GreaterThan",
    GREATER_THAN_OR_EQUAL = 25 => "GreaterThanOrEqual",
    IDENTICAL = 26 => "Identical",
    CONTAINS = 27 => "Contains",
    INCREMENT = 28 => "Increment",
    DECREMENT = 29 => "Decrement",
    NEGATIVE = 30 => "Negative",
    POSITIVE = 31 => "Positive",
    DEREFERENCE = 32 => "Dereference",
    TAKE_ADDRESS = 33 => "TakeAddress",
    FILE = 34 => "File",
    ADD = 35 => "Add",
    SUBSTRACT = 36 => "Substract",
    MULTIPLY = 37 => "Multiply",
    DIVIDE = 38 => "Divide",
    MODULO = 39 => "Modulo",
    PACKAGE = 40 => "Package",
    DECLARATION = 41 => "Declaration",
    IMPORT = 42 => "Import",
    PATHNAME = 43 => "Pathname",
    ALIAS = 44 => "Alias",
    FUNCTION = 45 => "Function",
    BODY = 46 => "Body",
    NAME = 47 => "Name",
    RECEIVER = 48 => "Receiver",
    ARGUMENT = 49 => "Argument",
    VALUE = 50 => "Value",
    ARGS_LIST = 51 => "ArgsList",
    BASE = 52 => "Base",
    IMPLEMENTS = 53 => "Implements",
    INSTANCE = 54 => "Instance",
    SUBTYPE = 55 => "Subtype",
    SUBPACKAGE = 56 => "Subpackage",
    MODULE = 57 => "Module",
    FRIEND = 58 => "Friend",
    WORLD = 59 => "World",
    IF = 60 => "If",
    CONDITION = 61 => "Condition",
    THEN = 62 => "Then",
    ELSE = 63 => "Else",
    SWITCH = 64 => "Switch",
    CASE = 65 => "Case",
    DEFAULT = 66 => "Default",
    FOR = 67 => "For",
    INITIALIZATION = 68 => "Initialization",
    UPDATE = 69 => "Update",
    ITERATOR = 70 => "Iterator",
    WHILE = 71 => "While",
    DO_WHILE = 72 => "DoWhile",
    BREAK = 73 => "Break",
    CONTINUE = 74 => "Continue",
    GOTO = 75 => "Goto",
    BLOCK = 76 => "Block",
    SCOPE = 77 => "Scope",
    RETURN = 78 => "Return",
    TRY = 79 => "Try",
    CATCH = 80 => "Catch",
    FINALLY = 81 => "Finally",
    THROW = 82 => "Throw",
    ASSERT = 83 => "Assert",
    CALL = 84 => "Call",
    CALLEE = 85 => "Callee",
    POSITIONAL = 86 => "Positional",
    NOOP = 87 => "Noop",
    LITERAL = 88 => "Literal",
    BYTE = 89 => "Byte",
    BYTE_STRING = 90 => "ByteString",
    CHARACTER = 91 => "Character",
    LIST = 92 => "List",
    MAP = 93 => "Map",
    NULL = 94 => "Null",
    NUMBER = 95 => "Number",
    REGEXP = 96 => "Regexp",
    SET = 97 => "Set",
    STRING = 98 => "String",
    TUPLE = 99 => "Tuple",
    TYPE = 100 => "Type",
    ENTRY = 101 => "Entry",
    KEY = 102 => "Key",
    PRIMITIVE = 103 => "Primitive",
    ASSIGNMENT = 104 => "Assignment",
    THIS = 105 => "This",
    COMMENT = 106 => "Comment",
    DOCUMENTATION = 107 => "Documentation",
    WHITESPACE = 108 => "Whitespace",
    INCOMPLETE = 109 => "Incomplete",
    UNANNOTATED = 110 => "Unannotated",
    VISIBILITY = 111 => "Visibility",
    ANNOTATION = 112 => "Annotation",
    ANONYMOUS = 113 => "Anonymous",
    ENUMERATION = 114 => "Enumeration",
    ARITHMETIC = 115 => "Arithmetic",
    RELATIONAL = 116 => "Relational",
    VARIABLE = 117 => "Variable",
}
