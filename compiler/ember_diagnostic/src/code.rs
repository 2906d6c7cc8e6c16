use std::fmt;

macro_rules! codes {
    ($( $name:ident = $num:literal => $msg:literal, )*) => {
        /// Stable identifier of a lexer or parser issue.
        ///
        /// Numbering is dense and never reused: E0xx are lexical, E1xx
        /// syntactic. Tests and tooling match on the code, never on the
        /// message.
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
        #[repr(u16)]
        pub enum Code {
            $( $name = $num, )*
        }

        impl Code {
            /// Every code, in numeric order.
            pub const ALL: &'static [Code] = &[$( Code::$name, )*];

            /// Short human-readable description.
            pub const fn message(self) -> &'static str {
                match self {
                    $( Code::$name => $msg, )*
                }
            }
        }
    };
}

codes! {
    // Lexer
    UnterminatedString = 1 => "unterminated string literal",
    InvalidEscape = 2 => "invalid escape sequence",
    LetterDirectlyAfterNumber = 3 => "letter directly after number",
    UnknownCharacter = 4 => "unknown character",
    UnterminatedSourceBlock = 5 => "unterminated source block",
    MismatchedOpeningParen = 6 => "unclosed opening bracket",
    MismatchedClosingParen = 7 => "closing bracket without an opener",
    InvalidNumber = 8 => "invalid number literal",
    MarkerWithoutOperator = 9 => "overload marker must be followed by an overloadable operator",
    EmptyPrefixedName = 10 => "expected a name after the prefix",

    // Parser
    ExpectedItem = 101 => "expected an item",
    ExpectedSemicolon = 102 => "expected `;`",
    ExpectedIdent = 103 => "expected an identifier",
    ExpectedFnName = 104 => "expected a function name",
    ExpectedParamList = 105 => "expected a parameter list",
    ExpectedParamName = 106 => "expected a parameter name",
    ExpectedColon = 107 => "expected `:`",
    ExpectedType = 108 => "expected a type",
    ExpectedReturnType = 109 => "expected a return type after `->`",
    ExpectedFnBody = 110 => "expected a function body",
    ExpectedStructName = 111 => "expected a struct name",
    ExpectedStructBody = 112 => "expected `{` with struct fields",
    ExpectedFieldName = 113 => "expected a field name",
    ExpectedFieldType = 114 => "expected a field type",
    ExpectedVariant = 115 => "expected another struct variant after `|`",
    ExpectedConstName = 116 => "expected a constant name",
    ExpectedEquals = 117 => "expected `=`",
    ExpectedParamDecl = 118 => "expected a `$name` parameter",
    ExpectedModuleName = 119 => "expected a module name string",
    ExpectedExpression = 120 => "expected an expression",
    ExpectedOperand = 121 => "expected an operand after the operator",
    ExpectedArrayLength = 122 => "expected `;` and a length in array type",
    ExpectedTypeArgs = 123 => "expected type arguments",
    EmptyTypeArgs = 124 => "type argument list is empty",
    EmptyGenericParams = 125 => "generic parameter list is empty",
    ExpectedGenericName = 126 => "expected a generic parameter name",
    ExpectedPattern = 127 => "expected a pattern",
    ExpectedCondition = 128 => "expected a condition",
    ExpectedBlock = 129 => "expected a block",
    ExpectedElseBranch = 130 => "expected `if` or a block after `else`",
    ExpectedMatchBody = 131 => "expected `{` with match arms",
    ExpectedFatArrow = 132 => "expected `=>`",
    EmptyMatch = 133 => "match has no arms",
    ExpectedIn = 134 => "expected `in`",
    ExpectedIterable = 135 => "expected an expression to iterate over",
    ExpectedForAfterLabel = 136 => "expected `for` after a loop label",
    ExpectedFieldAfterDot = 137 => "expected a field or method name after `.`",
    ExpectedIndex = 138 => "expected an index expression",
    ExpectedFieldValue = 139 => "expected a field value",
    ExpectedSourceBody = 140 => "expected `{` with source text",
    ExpectedDerivativeBody = 141 => "expected an expression after the derivative",
    ExpectedComma = 142 => "expected `,`",
    UnexpectedToken = 143 => "unexpected token",
    ReservedKeyword = 144 => "reserved keyword cannot be used here",
    MarkedOperatorOutsideFn = 145 => "overload-marked operator is only valid as a function name",
    RestNotAllowed = 146 => "`..` is not allowed here",
    IntegerTooLarge = 147 => "integer literal does not fit in i32",
    ExpectedLetPattern = 148 => "expected a pattern after `let`",
    ExpectedAssignValue = 149 => "expected a value after the assignment",
    ExpectedLiteralAfterMinus = 150 => "expected a number after `-` in pattern",
    ExpectedLabel = 151 => "expected a label",
    ExpectedParamType = 152 => "expected a parameter type",
    ExpectedCallArgs = 153 => "expected call arguments after type arguments",
    ExpectedAssertCondition = 154 => "expected a condition after `assert`",
    ExpectedStructField = 155 => "expected a field in struct literal",
}

impl Code {
    #[inline]
    pub const fn number(self) -> u16 {
        self as u16
    }

    /// Whether the lexer (as opposed to the parser) raises this code.
    #[inline]
    pub const fn is_lexical(self) -> bool {
        self.number() < 100
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:03}", self.number())
    }
}
